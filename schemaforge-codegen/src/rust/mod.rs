//! Rust code generation modules.

pub mod enums;
pub mod imports;
pub mod structs;
pub mod types;
pub mod unions;

pub use enums::EnumGenerator;
pub use imports::{Helper, Import, ImportSet};
pub use structs::StructGenerator;
pub use types::{TypeContext, TypeGenerator, extra_derives};
pub use unions::UnionGenerator;
