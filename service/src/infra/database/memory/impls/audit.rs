//! [`audit::Entry`]-related [`Database`] implementations.

use common::operations::{By, Insert, Select};
use tracerr::Traced;

use crate::{
    domain::audit,
    infra::{
        database::{self, memory::Access, Memory},
        Database,
    },
};

impl<C> Database<Insert<audit::Entry>> for Memory<C>
where
    C: Access,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(entry): Insert<audit::Entry>,
    ) -> Result<Self::Ok, Self::Err> {
        self.write(move |s| s.audit.push(entry))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Select<By<Vec<audit::Entry>, ()>>> for Memory<C>
where
    C: Access,
{
    type Ok = Vec<audit::Entry>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<audit::Entry>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.read(|s| s.audit.clone())
            .await
            .map_err(tracerr::wrap!())
    }
}
