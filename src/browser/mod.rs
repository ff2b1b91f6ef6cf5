pub mod fallback;
pub mod mock;
pub mod page;

pub use fallback::{Fallback, first_visible};
pub use mock::MockPage;
pub use page::{LoadState, Page, PageError, PageResult, WaitState};
