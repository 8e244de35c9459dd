mod formatter;

pub use formatter::JobFormatter;
