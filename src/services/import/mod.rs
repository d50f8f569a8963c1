pub mod folder_outline;
pub mod question_sheet;
