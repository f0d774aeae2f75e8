use sea_orm::entity::prelude::*;

/// One weakly-typed document in the shared record namespace.
///
/// `fields` holds the kind-specific payload as a JSON object; consumers read
/// absent entries with per-type defaults, exactly like the cloud store this
/// table stands in for.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "records")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub record_type: String,
    pub fields: Json,
    pub revision: i64,
    pub modified_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
