pub(crate) use crate::config::Config;
pub(crate) use crate::datasheet::Datasheet;
pub(crate) use crate::error::{
    bail, DatasheetError, DatasheetResult,
};
pub(crate) use crate::progress::ProgressBarBuilder;
pub(crate) use crate::repository::Repository;
