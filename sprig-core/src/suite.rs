//! The declaration surface handed to suite definitions.

use crate::outcome::Outcome;
use crate::tree::NodeKind;

/// A hook or test body, bound to an explicit fixture context of type `C`.
pub type Body<'a, C> = Box<dyn FnMut(&mut C) -> Outcome + 'a>;

/// Receives declarations as a suite definition runs.
///
/// Discovery records them into a tree; replay walks them with an id cursor to
/// decide which single body actually executes.
pub trait Declarations<'a, C> {
    /// Called when a group is declared. Returns whether the group's body should run.
    fn enter_group(&mut self, name: String) -> bool;

    /// Called after an entered group's body returns.
    fn leave_group(&mut self);

    /// Called for every test, hook and skipped test.
    fn declare(&mut self, kind: NodeKind, name: String, body: Body<'a, C>);
}

/// Declares groups, tests and hooks.
///
/// A suite definition is a closure taking `&mut Suite`; it may be invoked more
/// than once (see [`crate::replay()`]) and must declare the same shape every
/// time.
///
/// ```
/// use sprig_core::{check, discover};
///
/// #[derive(Default)]
/// struct Fixture {
///     items: Vec<u32>,
/// }
///
/// let tree = discover("vec", |s| {
///     s.before_each(|f: &mut Fixture| {
///         f.items = vec![1, 2];
///         Ok(())
///     });
///
///     s.describe("push", |s| {
///         s.it("appends to the end", |f| {
///             f.items.push(3);
///             check!(f.items.last() == Some(&3));
///             Ok(())
///         });
///     });
/// })
/// .unwrap();
///
/// assert_eq!(tree.len(), 4);
/// ```
pub struct Suite<'s, 'a, C> {
    sink: &'s mut dyn Declarations<'a, C>,
}

impl<'s, 'a, C> Suite<'s, 'a, C> {
    /// Returns a suite that forwards declarations to `sink`.
    pub fn new(sink: &'s mut dyn Declarations<'a, C>) -> Self {
        Self { sink }
    }

    /// Declares a named group; `body` declares its contents.
    pub fn describe(&mut self, name: impl Into<String>, body: impl FnOnce(&mut Self)) {
        if self.sink.enter_group(name.into()) {
            body(self);
            self.sink.leave_group();
        }
    }

    /// Declares a test.
    pub fn it(&mut self, name: impl Into<String>, body: impl FnMut(&mut C) -> Outcome + 'a) {
        self.sink.declare(NodeKind::Test, name.into(), Box::new(body));
    }

    /// Declares a test that is registered but never run.
    pub fn xit(&mut self, name: impl Into<String>, body: impl FnMut(&mut C) -> Outcome + 'a) {
        self.sink.declare(NodeKind::Skipped, name.into(), Box::new(body));
    }

    /// Declares a hook that runs once before the enclosing group's children.
    pub fn before(&mut self, body: impl FnMut(&mut C) -> Outcome + 'a) {
        self.hook(NodeKind::Before, body);
    }

    /// Declares a hook that runs once after the enclosing group's children.
    pub fn after(&mut self, body: impl FnMut(&mut C) -> Outcome + 'a) {
        self.hook(NodeKind::After, body);
    }

    /// Declares a hook that runs before every test nested in the enclosing group.
    pub fn before_each(&mut self, body: impl FnMut(&mut C) -> Outcome + 'a) {
        self.hook(NodeKind::BeforeEach, body);
    }

    /// Declares a hook that runs after every test nested in the enclosing group.
    pub fn after_each(&mut self, body: impl FnMut(&mut C) -> Outcome + 'a) {
        self.hook(NodeKind::AfterEach, body);
    }

    fn hook(&mut self, kind: NodeKind, body: impl FnMut(&mut C) -> Outcome + 'a) {
        self.sink.declare(kind, kind.to_string(), Box::new(body));
    }
}
