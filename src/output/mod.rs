pub mod formatter;

pub use formatter::{
    format_class_list, format_class_summary, format_coefficients, format_global_summary,
    format_rythme_scores, format_student_table, should_use_colors,
};
