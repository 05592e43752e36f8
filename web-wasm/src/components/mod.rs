pub mod agent_chat;
pub mod camera_capture;
pub mod header;
pub mod mode_selector;
pub mod product_analysis;
pub mod upload_area;
