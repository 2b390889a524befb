pub mod analyze;
pub mod books;
pub mod fallback;
pub mod health;

pub use analyze::analyze_config;
pub use books::books_config;
pub use fallback::{error_handlers, json_config, landing_page, not_found};
pub use health::health_check;
