//! Block model integration tests.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use skope::data::{ArrayNode, BasicNode, StructNode};
use skope::model::{
    BlockModel, CapabilityError, DataNode, ItemData, ItemModel, ItemRole, ModelError, ModelIndex,
    NodeRef, Value, ValueResult,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("skope=debug")
        .with_test_writer()
        .try_init();
}

fn text(model: &BlockModel, index: &ModelIndex) -> Option<String> {
    model.display_text(index)
}

/// Builds `[S { a: 5, b: [7] }]`.
fn scenario() -> BlockModel {
    let block = StructNode::new("S");
    block.add_field("a", BasicNode::new("int", 5)).unwrap();
    let b = ArrayNode::new();
    b.push(BasicNode::new("int", 7)).unwrap();
    block.add_field("b", b).unwrap();

    let blocks: Vec<NodeRef> = vec![block];
    BlockModel::new(blocks)
}

/// Visits every index reachable from `parent`, in every column.
fn walk(model: &BlockModel, parent: &ModelIndex, visit: &mut dyn FnMut(&ModelIndex, &ModelIndex)) {
    for row in 0..model.row_count(parent) {
        for column in 0..model.column_count(parent) {
            let index = model.index(row, column, parent);
            assert!(index.is_valid());
            visit(&index, parent);
        }
        let first = model.index(row, 0, parent);
        walk(model, &first, visit);
    }
}

#[test]
fn test_scenario_cells() {
    init_tracing();
    let model = scenario();
    let root = ModelIndex::invalid();

    assert_eq!(model.row_count(&root), 1);
    assert_eq!(model.column_count(&root), 3);

    let block = model.index(0, 0, &root);
    assert_eq!(text(&model, &block).as_deref(), Some("[0]"));
    assert_eq!(text(&model, &model.index(0, 1, &root)).as_deref(), Some("S"));
    assert!(model.data(&model.index(0, 2, &root), ItemRole::Display).is_none());
    assert_eq!(model.row_count(&block), 2);

    let a = model.index(0, 0, &block);
    assert_eq!(text(&model, &a).as_deref(), Some("a"));
    assert_eq!(text(&model, &model.index(0, 2, &block)).as_deref(), Some("5"));

    let b = model.index(1, 0, &block);
    assert_eq!(text(&model, &b).as_deref(), Some("b"));
    assert_eq!(text(&model, &model.index(1, 1, &block)).as_deref(), Some("Array"));
    assert_eq!(model.row_count(&b), 1);

    let element = model.index(0, 0, &b);
    assert_eq!(text(&model, &element).as_deref(), Some("[0]"));
    assert_eq!(text(&model, &model.index(0, 2, &b)).as_deref(), Some("7"));
    assert!(!model.has_children(&element));
}

#[test]
fn test_parent_of_index_round_trips() {
    let model = scenario();
    let mut visited = 0;
    walk(&model, &ModelIndex::invalid(), &mut |index, parent| {
        assert_eq!(&model.parent(index), parent);
        visited += 1;
    });
    assert_eq!(visited, 4 * 3);
}

#[test]
fn test_child_rows_agree_with_node() {
    let model = scenario();
    walk(&model, &ModelIndex::invalid(), &mut |index, parent| {
        if !parent.is_valid() {
            return;
        }
        let parent_node = model.node(parent).unwrap();
        let child = model.node(index).unwrap();
        assert_eq!(parent_node.row_of(&child), Some(index.row()));
    });
}

#[test]
fn test_root_count_matches_blocks() {
    for count in [0usize, 1, 5] {
        let blocks: Vec<NodeRef> = (0..count)
            .map(|_| -> NodeRef { StructNode::new("NiNode") })
            .collect();
        let model = BlockModel::new(blocks);
        assert_eq!(model.row_count(&ModelIndex::invalid()), count);
        for row in 0..count {
            let index = model.index(row, 0, &ModelIndex::invalid());
            assert_eq!(model.display_text(&index), Some(format!("[{row}]")));
        }
    }
}

#[test]
fn test_equal_values_keep_distinct_rows() {
    let block = StructNode::new("Pair");
    block.add_field("x", BasicNode::new("int", 0)).unwrap();
    block.add_field("y", BasicNode::new("int", 0)).unwrap();
    let blocks: Vec<NodeRef> = vec![block];
    let model = BlockModel::new(blocks);

    let root = ModelIndex::invalid();
    let block = model.index(0, 0, &root);
    let y = model.index(1, 0, &block);
    assert_eq!(model.parent(&y), block);
    assert_eq!(model.display_text(&y).as_deref(), Some("y"));
    assert_ne!(y.internal_id(), model.index(0, 0, &block).internal_id());
}

#[test]
fn test_cross_reference_to_block() {
    let header = StructNode::new("Header");
    let mesh: NodeRef = StructNode::new("MeshChunk");
    let node: NodeRef = StructNode::new("NodeChunk");
    let outside: NodeRef = StructNode::new("Detached");

    header.add_field("Geometry", BasicNode::reference("Ref", mesh.clone())).unwrap();
    header.add_field("Other", BasicNode::reference("Ref", outside)).unwrap();
    header.add_field("Empty", BasicNode::new("Ref", Value::Null)).unwrap();

    let blocks: Vec<NodeRef> = vec![header, node, mesh];
    let model = BlockModel::new(blocks);
    let header = model.index(0, 0, &ModelIndex::invalid());

    let geometry = model.index(0, 2, &header);
    assert_eq!(model.display_text(&geometry).as_deref(), Some("[2] MeshChunk"));

    let other = model.index(1, 2, &header);
    assert_eq!(model.display_text(&other).as_deref(), Some("<Detached>"));

    let empty = model.index(2, 2, &header);
    assert_eq!(model.display_text(&empty).as_deref(), Some("None"));
}

#[test]
fn test_line_breaks_become_spaces() {
    let block = StructNode::new("NiStringExtraData");
    block.add_field("Data", BasicNode::new("string", "line1\nline2\r\nend")).unwrap();
    block.add_field("Raw", BasicNode::opaque("ByteArray", "00 01\n02")).unwrap();
    let blocks: Vec<NodeRef> = vec![block];
    let model = BlockModel::new(blocks);

    let block = model.index(0, 0, &ModelIndex::invalid());
    assert_eq!(
        model.display_text(&model.index(0, 2, &block)).as_deref(),
        Some("line1 line2  end")
    );
    assert_eq!(model.display_text(&model.index(1, 2, &block)).as_deref(), Some("00 01 02"));
}

/// A node whose value cannot be read but which still has a text form.
struct Packed;

impl fmt::Display for Packed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "packed\r\ndata")
    }
}

impl DataNode for Packed {
    fn type_name(&self) -> &str {
        "Packed"
    }

    fn value(&self) -> ValueResult {
        Err(CapabilityError::Unimplemented)
    }
}

#[test]
fn test_unimplemented_value_uses_display() {
    let blocks: Vec<NodeRef> = vec![Arc::new(Packed)];
    let model = BlockModel::new(blocks);
    let value = model.index(0, 2, &ModelIndex::invalid());

    assert_eq!(model.display_text(&value).as_deref(), Some("packed  data"));
    assert!(!model.flags(&value).editable);
}

#[test]
fn test_value_column_flags() {
    let model = scenario();
    let root = ModelIndex::invalid();
    let block = model.index(0, 0, &root);

    for column in 0..3 {
        let flags = model.flags(&model.index(0, column, &root));
        assert!(flags.enabled && flags.selectable);
        assert!(!flags.editable, "structure column {column} must not be editable");
    }

    assert!(model.flags(&model.index(0, 2, &block)).editable);
    assert!(!model.flags(&model.index(0, 0, &block)).editable);
    assert!(!model.flags(&model.index(1, 2, &block)).editable);
}

#[test]
fn test_set_data_is_rejected() {
    init_tracing();
    let model = scenario();
    let block = model.index(0, 0, &ModelIndex::invalid());
    let a = model.index(0, 2, &block);

    assert!(!model.set_data(&a, ItemData::from(9i64), ItemRole::Edit));
    assert!(!model.set_data(&a, ItemData::from("9"), ItemRole::Display));
    assert_eq!(model.display_text(&a).as_deref(), Some("5"));
}

#[test]
fn test_other_roles_are_empty() {
    let model = scenario();
    let block = model.index(0, 0, &ModelIndex::invalid());
    assert!(model.data(&block, ItemRole::ToolTip).is_none());
    assert!(model.data(&block, ItemRole::User(0)).is_none());
}

#[test]
fn test_set_blocks_emits_reset() {
    init_tracing();
    let model = scenario();
    let events = Arc::new(Mutex::new(Vec::new()));

    let before = events.clone();
    model.signals().model_about_to_reset.connect(move |_| before.lock().push("about"));
    let after = events.clone();
    model.signals().model_reset.connect(move |_| after.lock().push("reset"));

    let replacement: Vec<NodeRef> = vec![StructNode::new("A"), StructNode::new("B")];
    model.set_blocks(replacement);

    assert_eq!(*events.lock(), vec!["about", "reset"]);
    assert_eq!(model.block_count(), 2);
    assert_eq!(
        model.display_text(&model.index(1, 1, &ModelIndex::invalid())).as_deref(),
        Some("B")
    );
}

#[test]
fn test_stale_index_is_rejected() {
    let model = scenario();
    let block = model.index(0, 0, &ModelIndex::invalid());
    model.set_blocks(Vec::new());

    assert!(matches!(model.node(&block), Err(ModelError::ForeignIndex { .. })));
}

#[test]
fn test_index_from_another_populated_model_is_rejected() {
    let first = scenario();
    let other: NodeRef = StructNode::new("Second");
    let second = BlockModel::new(vec![other]);
    let root = ModelIndex::invalid();

    // Both arenas hold a node in their first slot.
    let own = second.index(0, 0, &root);
    let foreign = first.index(0, 1, &root);
    assert_eq!(own.internal_id(), foreign.internal_id());

    assert!(matches!(second.node(&foreign), Err(ModelError::ForeignIndex { .. })));
    assert!(second.node(&own).is_ok());
}

#[test]
#[should_panic(expected = "not issued by this model")]
fn test_populated_model_panics_on_foreign_index() {
    let first = scenario();
    let second = scenario();
    let root = ModelIndex::invalid();
    second.index(0, 0, &root);
    let foreign = first.index(0, 1, &root);
    second.row_count(&foreign);
}

#[test]
#[should_panic(expected = "not issued by this model")]
fn test_foreign_index_panics() {
    let first = scenario();
    let second = scenario();
    let foreign = first.index(0, 0, &ModelIndex::invalid());
    second.row_count(&foreign);
}
