// Core modules implementing field resolvers, lookup tables, and error modeling.
pub mod birthdate;
pub mod century;
pub mod decode;
pub mod error;
pub mod governorate;
