//! Identifier generation

use uuid::Uuid;

/// Source of new entity ids
pub trait IdGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Random UUID v4 ids
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn generate(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uuid_generator() {
        let generator = UuidGenerator;
        let first = generator.generate();
        let second = generator.generate();

        assert!(Uuid::parse_str(&first).is_ok());
        assert_ne!(first, second);
    }
}
