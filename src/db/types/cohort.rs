use core::fmt;

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Experiment group a user is assigned to on first contact.
///
/// Narrow users pick from a flat category list, wide users drill down from a
/// top-level category into a subcategory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum Cohort {
    #[sea_orm(string_value = "narrow")]
    Narrow,
    #[sea_orm(string_value = "wide")]
    Wide,
}

impl Cohort {
    /// Uniform 50/50 assignment
    pub fn random() -> Self {
        if rand::random::<bool>() {
            Cohort::Narrow
        } else {
            Cohort::Wide
        }
    }
}

impl fmt::Display for Cohort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cohort::Narrow => write!(f, "narrow"),
            Cohort::Wide => write!(f, "wide"),
        }
    }
}
