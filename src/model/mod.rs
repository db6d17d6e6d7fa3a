pub mod common;
pub mod curso;
pub mod entity;
pub mod pessoa;
pub mod vinculo;

pub use common::*;
pub use curso::*;
pub use entity::{Entity, Patch, Reference};
pub use pessoa::*;
pub use vinculo::*;
