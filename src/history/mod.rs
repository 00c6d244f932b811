pub mod date_cursor;
pub mod url_template;
