use crate::model::{EngineKind, Failure, ResourceKind, SystemSummary, View};
use crate::view::{
    Table, Viewport, CONTAINER_COLUMNS, IMAGE_COLUMNS, NETWORK_COLUMNS, VOLUME_COLUMNS,
};

/// Current view plus the views to return to when a modal closes.
#[derive(Clone, Debug)]
pub struct ViewStack {
    current: View,
    stack: Vec<View>,
}

impl ViewStack {
    /// View shown when there is nothing to go back to.
    pub const FALLBACK: View = View::Containers;

    pub fn new(initial: View) -> Self {
        Self { current: initial, stack: Vec::new() }
    }

    pub fn current(&self) -> View {
        self.current
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Remember the current view and make `view` current.
    pub fn push(&mut self, view: View) {
        self.stack.push(self.current);
        self.current = view;
    }

    /// Return to the most recently pushed view, or the fallback when empty.
    pub fn pop(&mut self) -> View {
        self.current = self.stack.pop().unwrap_or(Self::FALLBACK);
        self.current
    }

    /// Jump straight to a base view. Anything stacked is forgotten.
    pub fn switch_to(&mut self, view: View) {
        self.stack.clear();
        self.current = view;
    }
}

impl Default for ViewStack {
    fn default() -> Self {
        Self::new(Self::FALLBACK)
    }
}

const SPINNER_FRAMES: [&str; 4] = ["|", "/", "-", "\\"];

/// Spinner shown next to the status text while work is outstanding.
///
/// Every `start` opens a new tick chain; ticks from older chains are ignored,
/// so restarting never doubles the animation speed.
#[derive(Clone, Debug, Default)]
pub struct BusyIndicator {
    active: bool,
    frame: usize,
    generation: u64,
}

impl BusyIndicator {
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Turn on and return the generation the next tick must carry.
    pub fn start(&mut self) -> u64 {
        self.active = true;
        self.generation += 1;
        self.generation
    }

    pub fn stop(&mut self) {
        self.active = false;
    }

    /// Advance one frame if the tick belongs to the live chain.
    /// Returns whether another tick should be scheduled.
    pub fn advance(&mut self, generation: u64) -> bool {
        if generation != self.generation {
            return false;
        }
        self.frame = (self.frame + 1) % SPINNER_FRAMES.len();
        self.active
    }

    pub fn glyph(&self) -> &'static str {
        SPINNER_FRAMES[self.frame]
    }
}

/// Content of the Inspect or Logs pane.
#[derive(Clone, Debug, Default)]
pub struct Modal {
    pub viewport: Viewport,
    /// Content has been formatted into the viewport.
    pub ready: bool,
    /// Resource whose content this pane shows (or is waiting for).
    pub target: Option<String>,
    /// Unformatted body as delivered, kept so a resize can format it later.
    pub raw: Option<String>,
}

impl Modal {
    /// Point the pane at a new resource and drop the previous content.
    pub fn open(&mut self, target: &str) {
        self.target = Some(target.to_string());
        self.ready = false;
        self.raw = None;
        self.viewport.clear();
    }
}

/// What to do with a logs/inspect result for a resource that is no longer shown.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum StaleResultPolicy {
    /// Drop results whose target differs from the open pane.
    #[default]
    Discard,
    /// Apply to whichever pane is current at delivery time.
    Apply,
}

/// Everything the dashboard knows. Written only by the event loop.
#[derive(Clone, Debug)]
pub struct AppState {
    pub engine: EngineKind,
    pub views: ViewStack,
    pub containers: Table,
    pub images: Table,
    pub volumes: Table,
    pub networks: Table,
    pub system: SystemSummary,
    pub inspect: Modal,
    pub logs: Modal,
    pub error: Option<Failure>,
    pub status: Option<String>,
    pub busy: BusyIndicator,
    pub width: u16,
    pub height: u16,
    pub stale_results: StaleResultPolicy,
}

impl AppState {
    pub fn new(engine: EngineKind) -> Self {
        Self {
            engine,
            views: ViewStack::default(),
            containers: Table::new(&CONTAINER_COLUMNS),
            images: Table::new(&IMAGE_COLUMNS),
            volumes: Table::new(&VOLUME_COLUMNS),
            networks: Table::new(&NETWORK_COLUMNS),
            system: SystemSummary::default(),
            inspect: Modal::default(),
            logs: Modal::default(),
            error: None,
            status: None,
            busy: BusyIndicator::default(),
            width: 0,
            height: 0,
            stale_results: StaleResultPolicy::default(),
        }
    }

    pub fn with_stale_results(mut self, policy: StaleResultPolicy) -> Self {
        self.stale_results = policy;
        self
    }

    pub fn current_view(&self) -> View {
        self.views.current()
    }

    pub fn table(&self, kind: ResourceKind) -> &Table {
        match kind {
            ResourceKind::Containers => &self.containers,
            ResourceKind::Images => &self.images,
            ResourceKind::Volumes => &self.volumes,
            ResourceKind::Networks => &self.networks,
        }
    }

    pub fn table_mut(&mut self, kind: ResourceKind) -> &mut Table {
        match kind {
            ResourceKind::Containers => &mut self.containers,
            ResourceKind::Images => &mut self.images,
            ResourceKind::Volumes => &mut self.volumes,
            ResourceKind::Networks => &mut self.networks,
        }
    }

    /// The pane backing a modal view.
    pub fn modal(&self, view: View) -> Option<&Modal> {
        match view {
            View::Inspect => Some(&self.inspect),
            View::Logs => Some(&self.logs),
            _ => None,
        }
    }

    pub fn modal_mut(&mut self, view: View) -> Option<&mut Modal> {
        match view {
            View::Inspect => Some(&mut self.inspect),
            View::Logs => Some(&mut self.logs),
            _ => None,
        }
    }

    /// Show progress text and turn the spinner on. Returns the tick generation.
    pub fn begin_busy(&mut self, status: String) -> u64 {
        self.status = Some(status);
        self.busy.start()
    }

    /// Clear the spinner and the progress text.
    pub fn end_busy(&mut self) {
        self.busy.stop();
        self.status = None;
    }

    pub fn view_name(&self) -> String {
        let target = |m: &Modal| m.target.clone().unwrap_or_default();
        match self.current_view() {
            View::Containers => "Containers".to_string(),
            View::Images => "Images".to_string(),
            View::Volumes => "Volumes".to_string(),
            View::Networks => "Networks".to_string(),
            View::System => "System".to_string(),
            View::Inspect => format!("Inspect {}", target(&self.inspect)),
            View::Logs => format!("Logs for {}", target(&self.logs)),
        }
    }
}
