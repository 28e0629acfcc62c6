//! SQLite DDL types - re-exports from sqlshift_types plus [`Entity`] impls

pub use sqlshift_types::sqlite::ddl::*;

use crate::traits::{Entity, EntityKind};

impl Entity for Table {
    const KIND: EntityKind = EntityKind::Table;

    fn entity_name(&self) -> &str {
        &self.name
    }
}

impl Entity for View {
    const KIND: EntityKind = EntityKind::View;

    fn entity_name(&self) -> &str {
        &self.name
    }
}

macro_rules! impl_table_scoped {
    ($ty:ty, $kind:expr, |$e:ident| $explicit:expr) => {
        impl Entity for $ty {
            const KIND: EntityKind = $kind;

            fn entity_name(&self) -> &str {
                &self.name
            }

            fn parent_table(&self) -> Option<&str> {
                Some(&self.table)
            }

            fn name_explicit(&self) -> bool {
                let $e = self;
                $explicit
            }
        }
    };
}

impl_table_scoped!(Column, EntityKind::Column, |_c| true);
impl_table_scoped!(Index, EntityKind::Index, |i| i.origin == IndexOrigin::Manual);
impl_table_scoped!(ForeignKey, EntityKind::ForeignKey, |f| f.name_explicit);
impl_table_scoped!(PrimaryKey, EntityKind::PrimaryKey, |p| p.name_explicit);
impl_table_scoped!(UniqueConstraint, EntityKind::UniqueConstraint, |u| u.name_explicit);
impl_table_scoped!(CheckConstraint, EntityKind::CheckConstraint, |_c| true);
