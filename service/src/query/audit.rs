//! [`Query`] collection related to the audit log.

use common::operations::By;

use crate::domain::audit;
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries every recorded [`audit::Entry`], oldest first.
pub type Log = DatabaseQuery<By<Vec<audit::Entry>, ()>>;
