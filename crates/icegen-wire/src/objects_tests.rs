use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::{
    DecodeError, InputStream, Instance, ObjectReader, ObjectWriter, OutputStream, PatchTable,
};

const NODE: &str = "::Demo::Node";
const SPECIAL: &str = "::Demo::Special";
const FUTURE: &str = "::Demo::Future";
const OTHER: &str = "::Demo::Other";

#[derive(Debug, Default)]
struct NodeData {
    name: String,
    left: Option<Node>,
    right: Option<Node>,
}

#[derive(Clone, Debug)]
struct Node {
    kind: &'static str,
    data: Rc<RefCell<NodeData>>,
}

impl Node {
    fn new(kind: &'static str, name: &str) -> Self {
        Self {
            kind,
            data: Rc::new(RefCell::new(NodeData {
                name: name.to_owned(),
                ..NodeData::default()
            })),
        }
    }

    fn name(&self) -> String {
        self.data.borrow().name.clone()
    }

    fn left(&self) -> Option<Node> {
        self.data.borrow().left.clone()
    }

    fn right(&self) -> Option<Node> {
        self.data.borrow().right.clone()
    }

    fn set_left(&self, v: Option<Node>) {
        self.data.borrow_mut().left = v;
    }

    fn set_right(&self, v: Option<Node>) {
        self.data.borrow_mut().right = v;
    }
}

impl Instance for Node {
    fn ice_id(&self) -> &'static str {
        self.kind
    }

    fn ice_is_a(&self, id: &str) -> bool {
        let ids: &[&str] = match self.kind {
            SPECIAL => &[SPECIAL, NODE],
            FUTURE => &[FUTURE, NODE],
            NODE => &[NODE],
            _ => &[OTHER],
        };
        ids.contains(&id) || id == crate::ROOT_TYPE_ID
    }

    fn identity(&self) -> usize {
        Rc::as_ptr(&self.data) as usize
    }

    fn write(&self, out: &mut OutputStream, objects: &mut ObjectWriter<Self>) {
        if self.kind == OTHER {
            out.write_type_id(OTHER);
            out.start_write_slice();
            out.end_write_slice();
            ObjectWriter::<Node>::write_root_slice(out);
            return;
        }
        if self.kind == SPECIAL || self.kind == FUTURE {
            out.write_type_id(self.kind);
            out.start_write_slice();
            out.write_int(99);
            out.end_write_slice();
        }
        let data = self.data.borrow();
        out.write_type_id(NODE);
        out.start_write_slice();
        out.write_string(&data.name);
        objects.write_object(out, data.left.as_ref());
        objects.write_object(out, data.right.as_ref());
        out.end_write_slice();
        ObjectWriter::<Node>::write_root_slice(out);
    }
}

fn read_node_slice(
    node: &Node,
    input: &mut InputStream<'_>,
    reader: &mut ObjectReader<Node>,
) -> Result<(), DecodeError> {
    input.start_read_slice()?;
    node.data.borrow_mut().name = input.read_string()?;
    let target = node.clone();
    reader.read_object(input, NODE, move |v| target.set_left(v))?;
    let target = node.clone();
    reader.read_object(input, NODE, move |v| target.set_right(v))?;
    input.end_read_slice()?;
    input.read_root_slice()
}

fn factory(
    id: &str,
    input: &mut InputStream<'_>,
    reader: &mut ObjectReader<Node>,
) -> Result<Option<Node>, DecodeError> {
    match id {
        NODE => {
            let node = Node::new(NODE, "");
            read_node_slice(&node, input, reader)?;
            Ok(Some(node))
        }
        SPECIAL => {
            let node = Node::new(SPECIAL, "");
            input.start_read_slice()?;
            input.end_read_slice()?;
            input.read_type_id()?;
            read_node_slice(&node, input, reader)?;
            Ok(Some(node))
        }
        _ => Ok(None),
    }
}

fn encode(root: Option<&Node>) -> Vec<u8> {
    let mut os = OutputStream::new();
    let mut writer = ObjectWriter::new();
    writer.write_object(&mut os, root);
    writer.write_pending_objects(&mut os);
    os.finished()
}

fn decode(bytes: &[u8], expected: &str) -> Result<Option<Node>, DecodeError> {
    let slot: Rc<RefCell<Option<Node>>> = Rc::default();
    let mut is = InputStream::new(bytes);
    let mut reader = ObjectReader::new();
    let target = slot.clone();
    reader.read_object(&mut is, expected, move |v| *target.borrow_mut() = v)?;
    reader.read_pending_objects(&mut is, factory)?;
    let value = slot.borrow().clone();
    Ok(value)
}

#[test]
fn null_reference() {
    let bytes = encode(None);
    assert_eq!(bytes, [0, 0, 0, 0, 0]);
    assert!(decode(&bytes, NODE).unwrap().is_none());
}

#[test]
fn two_class_members_land_in_their_own_slots() {
    let root = Node::new(NODE, "root");
    root.set_left(Some(Node::new(NODE, "x")));
    root.set_right(Some(Node::new(NODE, "y")));

    let decoded = decode(&encode(Some(&root)), NODE).unwrap().unwrap();
    assert_eq!(decoded.name(), "root");
    assert_eq!(decoded.left().unwrap().name(), "x");
    assert_eq!(decoded.right().unwrap().name(), "y");
}

#[test]
fn cycles_are_patched_after_reconstruction() {
    let a = Node::new(NODE, "a");
    let b = Node::new(NODE, "b");
    a.set_left(Some(b.clone()));
    b.set_left(Some(a.clone()));
    a.set_right(Some(a.clone()));

    let decoded = decode(&encode(Some(&a)), NODE).unwrap().unwrap();
    let b2 = decoded.left().unwrap();
    assert_eq!(b2.name(), "b");
    assert_eq!(b2.left().unwrap().identity(), decoded.identity());
    assert_eq!(decoded.right().unwrap().identity(), decoded.identity());

    // break the cycles so the test does not leak
    decoded.set_left(None);
    decoded.set_right(None);
    b2.set_left(None);
    a.set_left(None);
    a.set_right(None);
    b.set_left(None);
}

#[test]
fn shared_instance_is_written_once() {
    let shared = Node::new(NODE, "shared");
    let root = Node::new(NODE, "root");
    root.set_left(Some(shared.clone()));
    root.set_right(Some(shared));

    let decoded = decode(&encode(Some(&root)), NODE).unwrap().unwrap();
    assert_eq!(
        decoded.left().unwrap().identity(),
        decoded.right().unwrap().identity()
    );
}

#[test]
fn derived_instance_in_base_slot() {
    let root = Node::new(SPECIAL, "special");
    let decoded = decode(&encode(Some(&root)), NODE).unwrap().unwrap();
    assert_eq!(decoded.ice_id(), SPECIAL);
    assert_eq!(decoded.name(), "special");
}

#[test]
fn unknown_derived_slices_are_skipped() {
    let root = Node::new(FUTURE, "from the future");
    let decoded = decode(&encode(Some(&root)), NODE).unwrap().unwrap();
    assert_eq!(decoded.ice_id(), NODE);
    assert_eq!(decoded.name(), "from the future");
}

#[test]
fn no_factory_for_any_slice() {
    let root = Node::new(OTHER, "");
    assert_eq!(
        decode(&encode(Some(&root)), NODE).unwrap_err(),
        DecodeError::NoObjectFactory(OTHER.to_owned())
    );
}

#[test]
fn type_mismatch_is_a_decode_error() {
    let root = Node::new(NODE, "plain");
    assert_eq!(
        decode(&encode(Some(&root)), SPECIAL).unwrap_err(),
        DecodeError::UnexpectedObjectType {
            expected: SPECIAL.to_owned(),
            actual: NODE.to_owned(),
        }
    );
}

#[test]
fn failed_resolution_applies_nothing() {
    let mut table: PatchTable<Node> = PatchTable::new();
    let hits = Rc::new(RefCell::new(0));

    let h = hits.clone();
    table.register(1, NODE, move |_| *h.borrow_mut() += 1);
    let h = hits.clone();
    table.register(2, SPECIAL, move |_| *h.borrow_mut() += 1);

    let instances = BTreeMap::from([(1, Node::new(NODE, "a")), (2, Node::new(NODE, "b"))]);
    assert!(table.resolve(&instances).is_err());
    assert_eq!(*hits.borrow(), 0);
    assert_eq!(table.len(), 2);

    assert_eq!(table.abandon(), 2);
    assert!(table.is_empty());
    assert_eq!(*hits.borrow(), 0);
}

#[test]
fn unresolved_instance() {
    let mut table: PatchTable<Node> = PatchTable::new();
    table.register(7, NODE, |_| {});
    assert_eq!(
        table.resolve(&BTreeMap::new()),
        Err(DecodeError::UnresolvedInstance(7))
    );
}

#[test]
fn indexed_patches_resolve_in_any_order() {
    let target = Node::new(NODE, "holder");
    let mut table: PatchTable<Node> = PatchTable::new();

    // member 1 registered before member 0
    let t = target.clone();
    table.register(2, NODE, move |v| t.set_right(v));
    let t = target.clone();
    table.register(1, NODE, move |v| t.set_left(v));

    let instances = BTreeMap::from([(1, Node::new(NODE, "zero")), (2, Node::new(NODE, "one"))]);
    assert_eq!(table.resolve(&instances), Ok(2));
    assert_eq!(target.left().unwrap().name(), "zero");
    assert_eq!(target.right().unwrap().name(), "one");
}

#[test]
fn dictionary_values_patch_by_key() {
    let map: Rc<RefCell<BTreeMap<String, Option<Node>>>> = Rc::default();
    let mut table: PatchTable<Node> = PatchTable::new();

    for (key, index) in [("k1", 2), ("k2", 1), ("k3", 0)] {
        let map = map.clone();
        let key = key.to_owned();
        table.register(index, NODE, move |v| {
            map.borrow_mut().insert(key, v);
        });
    }

    let instances = BTreeMap::from([(1, Node::new(NODE, "one")), (2, Node::new(NODE, "two"))]);
    table.resolve(&instances).unwrap();

    let map = map.borrow();
    assert_eq!(map["k1"].as_ref().unwrap().name(), "two");
    assert_eq!(map["k2"].as_ref().unwrap().name(), "one");
    assert!(map["k3"].is_none());
}

#[test]
fn positive_reference_is_illegal() {
    let bytes = 3i32.to_le_bytes();
    let mut is = InputStream::new(&bytes);
    let mut reader: ObjectReader<Node> = ObjectReader::new();
    assert_eq!(
        reader.read_object(&mut is, NODE, |_| {}),
        Err(DecodeError::IllegalObjectReference(3))
    );
}

#[test]
fn most_negative_reference_is_illegal() {
    let bytes = i32::MIN.to_le_bytes();
    let mut is = InputStream::new(&bytes);
    let mut reader: ObjectReader<Node> = ObjectReader::new();
    assert_eq!(
        reader.read_object(&mut is, NODE, |_| {}),
        Err(DecodeError::IllegalObjectReference(i32::MIN))
    );
    assert_eq!(reader.pending_patches(), 0);
}

#[test]
fn reader_is_reusable_after_a_failed_pass() {
    let mut reader = ObjectReader::new();

    let stale: Rc<RefCell<Option<Node>>> = Rc::default();
    let bytes = encode(Some(&Node::new(OTHER, "")));
    let mut is = InputStream::new(&bytes);
    let target = stale.clone();
    reader
        .read_object(&mut is, NODE, move |v| *target.borrow_mut() = v)
        .unwrap();
    assert_eq!(
        reader.read_pending_objects(&mut is, factory),
        Err(DecodeError::NoObjectFactory(OTHER.to_owned()))
    );
    assert_eq!(reader.pending_patches(), 0);

    let fresh: Rc<RefCell<Option<Node>>> = Rc::default();
    let bytes = encode(Some(&Node::new(NODE, "next")));
    let mut is = InputStream::new(&bytes);
    let target = fresh.clone();
    reader
        .read_object(&mut is, NODE, move |v| *target.borrow_mut() = v)
        .unwrap();
    // the root plus its two null members
    assert_eq!(reader.read_pending_objects(&mut is, factory), Ok(3));

    assert!(stale.borrow().is_none());
    assert_eq!(fresh.borrow().as_ref().unwrap().name(), "next");
}
