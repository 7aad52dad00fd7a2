pub use super::unit_versions::Entity as UnitVersions;
