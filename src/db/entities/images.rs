use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A cached provider image under one category key.
///
/// `image_id` is the provider's identifier and is only unique per `category_key`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "images")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub category_key: String,
    pub image_id: String,
    pub image_url: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
