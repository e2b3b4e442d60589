pub mod country;
pub mod events;
pub mod format;
pub mod info;
pub mod keyboard;
pub mod notice;
pub mod photo;
pub mod text;

pub use country::{chat_country, show_or_set_country};
pub use events::{callback_handler, EventService};
pub use format::{format_event, format_event_list};
pub use info::show_system_info;
pub use notice::process_notice;
pub use photo::analyze_photo_notice;
pub use text::{analyze_text_notice, help};
