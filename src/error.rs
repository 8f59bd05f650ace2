use pixop_engine::BufferError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecipeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid step {index}: {reason}")]
    InvalidStep { index: usize, reason: String },
}

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("Buffer error: {0}")]
    Buffer(#[from] BufferError),

    #[error("Recipe error: {0}")]
    Recipe(#[from] RecipeError),

    #[error("Worker failed: {0}")]
    Worker(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_step_message() {
        let error = RecipeError::InvalidStep {
            index: 2,
            reason: "gamma must be finite".to_string(),
        };
        assert_eq!(error.to_string(), "Invalid step 2: gamma must be finite");
    }

    #[test]
    fn test_yaml_error_wrapped() {
        let yaml_error = serde_yaml::from_str::<Vec<u32>>("not: [a list").unwrap_err();
        let error: RecipeError = yaml_error.into();
        assert!(error.to_string().starts_with("YAML parse error:"));
    }

    #[test]
    fn test_process_error_from_buffer_error() {
        let error: ProcessError = BufferError::AllocationFailed { bytes: 64 }.into();
        match error {
            ProcessError::Buffer(BufferError::AllocationFailed { bytes }) => assert_eq!(bytes, 64),
            other => panic!("Expected Buffer variant, got {other:?}"),
        }
    }

    #[test]
    fn test_process_error_from_recipe_error() {
        let error: ProcessError = RecipeError::InvalidStep {
            index: 0,
            reason: "bad".to_string(),
        }
        .into();
        assert_eq!(error.to_string(), "Recipe error: Invalid step 0: bad");
    }

    #[test]
    fn test_worker_error_message() {
        let error = ProcessError::Worker("task panicked".to_string());
        assert_eq!(error.to_string(), "Worker failed: task panicked");
    }
}
