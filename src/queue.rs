use crate::actions::Action;

/// Ordered list of deferred actions
///
/// Append-only until drained. Draining hands every queued action, in
/// insertion order, to the caller and leaves the queue empty.
#[derive(Default)]
pub struct ActionQueue {
    actions: Vec<Box<dyn Action>>,
}

impl ActionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, action: Box<dyn Action>) {
        self.actions.push(action);
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn clear(&mut self) {
        self.actions.clear();
    }

    /// Take every queued action, oldest first
    pub fn drain(&mut self) -> Vec<Box<dyn Action>> {
        std::mem::take(&mut self.actions)
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Action> {
        self.actions.iter().map(|action| action.as_ref())
    }
}

impl std::fmt::Debug for ActionQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter().map(|action| action.describe())).finish()
    }
}
