pub mod execute;
pub mod feedback;
pub mod objects;
pub mod workflows;
