use crate::error::{ErrorContext, TallyError};

pub fn format_error_chain(error: &TallyError) -> String {
    let context = ErrorContext::new(error);
    context.to_string()
}
