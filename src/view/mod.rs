pub mod controller;
pub mod debounce;
pub mod model;

pub use controller::{ViewController, ViewEvent};
pub use debounce::Debouncer;
pub use model::{derive_view, ViewItems, ViewMode, ViewModel, ViewState};

use std::time::Duration;

/// 搜索去抖的默认延迟
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(250);
