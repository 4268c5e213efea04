use crate::actions::{Action, ActionContext};
use crate::browser::config::SessionOptions;
use crate::browser::engine::{Engine, Launcher, Page};
use crate::error::{BrowserError, Result};
use crate::queue::ActionQueue;
use crate::scope::Scope;
use crate::wait::{Clock, SystemClock};
use std::cell::RefCell;

/// Scripting session that owns one browser engine and one page
///
/// Verbs called on the session's scopes only queue actions. [`Session::run`]
/// launches the engine and page on first use and then executes the queue in
/// order, one action at a time.
pub struct Session {
    options: SessionOptions,

    launcher: Box<dyn Launcher>,

    clock: Box<dyn Clock>,

    /// Created lazily by the first `run`
    engine: Option<Box<dyn Engine>>,

    page: Option<Box<dyn Page>>,

    /// Actions waiting for the next `run`
    queue: RefCell<ActionQueue>,

    /// Actions replayed after every successful navigation
    after_open: RefCell<ActionQueue>,

    closed: bool,
}

impl Session {
    /// Create a session that launches its engine through `launcher`
    pub fn new(options: SessionOptions, launcher: impl Launcher + 'static) -> Self {
        Self {
            options,
            launcher: Box::new(launcher),
            clock: Box::new(SystemClock::new()),
            engine: None,
            page: None,
            queue: RefCell::new(ActionQueue::new()),
            after_open: RefCell::new(ActionQueue::new()),
            closed: false,
        }
    }

    /// Create a session backed by a local headless Chrome
    #[cfg(feature = "chrome")]
    pub fn chrome(options: SessionOptions) -> Self {
        Self::new(options, crate::browser::chrome::ChromeLauncher::default())
    }

    /// Replace the clock used for waits and delays
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// Scope with an empty selector prefix
    pub fn root(&self) -> Scope<'_> {
        Scope::root(self)
    }

    /// Scope nested under `selector`
    pub fn scope(&self, selector: &str) -> Scope<'_> {
        self.root().scope(selector)
    }

    /// Queue an action for the next `run`
    pub fn enqueue(&self, action: impl Action + 'static) -> &Self {
        self.enqueue_boxed(Box::new(action));
        self
    }

    pub(crate) fn enqueue_boxed(&self, action: Box<dyn Action>) {
        self.queue.borrow_mut().push(action);
    }

    /// Register an action to run right after every successful `open`
    pub fn after_open(&self, action: impl Action + 'static) -> &Self {
        self.after_open.borrow_mut().push(Box::new(action));
        self
    }

    /// Number of actions waiting for `run`
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Execute every queued action in order.
    ///
    /// Stops at the first failing action and returns its error; the actions
    /// queued after it are discarded without running.
    pub fn run(&mut self) -> Result<()> {
        if self.closed {
            return Err(BrowserError::SessionClosed);
        }

        self.ensure_engine()?;
        self.ensure_page()?;

        let actions = self.queue.get_mut().drain();
        let Some(page) = self.page.as_deref_mut() else {
            return Err(BrowserError::engine("page is not available"));
        };
        let mut context = ActionContext::new(page, &self.options, self.clock.as_ref(), self.after_open.get_mut());

        for (position, action) in actions.iter().enumerate() {
            context.trace(action.as_ref());
            if let Err(e) = action.execute(&mut context) {
                if self.options.debug {
                    log::debug!(
                        "{} failed, skipping {} queued action(s): {}",
                        action.describe(),
                        actions.len() - position - 1,
                        e
                    );
                }
                return Err(e);
            }
        }

        Ok(())
    }

    fn ensure_engine(&mut self) -> Result<()> {
        if self.engine.is_some() {
            return Ok(());
        }

        let params = self.options.launch_params();
        if self.options.debug {
            log::debug!("launching engine with {:?}", params.flags);
        }
        self.engine = Some(self.launcher.launch(&params)?);
        Ok(())
    }

    fn ensure_page(&mut self) -> Result<()> {
        if self.page.is_some() {
            return Ok(());
        }

        let Some(engine) = self.engine.as_mut() else {
            return Err(BrowserError::engine("engine is not running"));
        };
        self.page = Some(engine.create_page()?);
        Ok(())
    }

    /// Shut the engine down and drop everything queued.
    ///
    /// The session cannot run again afterwards.
    pub fn exit(&mut self) -> Result<()> {
        self.page = None;
        self.queue.get_mut().clear();
        self.after_open.get_mut().clear();
        self.closed = true;

        match self.engine.take() {
            Some(mut engine) => engine.exit(),
            None => Ok(()),
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("options", &self.options)
            .field("engine", &self.engine.is_some())
            .field("page", &self.page.is_some())
            .field("queue", &self.queue)
            .field("after_open", &self.after_open)
            .field("closed", &self.closed)
            .finish()
    }
}
