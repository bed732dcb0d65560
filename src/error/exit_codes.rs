use crate::error::TallyError;

pub fn get_exit_code(error: &TallyError) -> i32 {
    match error {
        TallyError::InvalidConfig(_)
        | TallyError::ConfigError(_)
        | TallyError::ValidationError(_) => 2,

        TallyError::PermissionDenied(_) => 13,

        TallyError::AlreadyExists(_) => 17,

        // EX_TEMPFAIL: the task-queue collaborator should retry the whole operation
        TallyError::LockTimeout { .. } => 75,

        _ => 1,
    }
}
