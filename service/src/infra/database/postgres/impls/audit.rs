//! [`audit::Entry`]-related [`Database`] implementations.

use common::operations::{By, Insert, Select};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::audit,
    infra::{
        database::{
            self,
            postgres::{self, Connection},
            Postgres,
        },
        Database,
    },
};

use super::{decode_all, FromRow};

impl FromRow for audit::Entry {
    fn from_row(row: &Row) -> Result<Self, postgres::Error> {
        Ok(Self {
            kind: row.try_get("kind")?,
            actor_id: row.try_get("actor_id")?,
            at: row.try_get("at")?,
            detail: row.try_get("detail")?,
        })
    }
}

impl<C> Database<Insert<audit::Entry>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(entry): Insert<audit::Entry>,
    ) -> Result<Self::Ok, Self::Err> {
        let audit::Entry {
            kind,
            actor_id,
            at,
            detail,
        } = entry;

        const SQL: &str = "\
            INSERT INTO audit_log (kind, actor_id, at, detail) \
            VALUES ($1::INT2, $2::INT8, $3::TIMESTAMPTZ, $4::TEXT)";
        self.exec(SQL, &[&kind, &actor_id, &at, &detail])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Select<By<Vec<audit::Entry>, ()>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<audit::Entry>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<audit::Entry>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            SELECT kind, actor_id, at, detail \
            FROM audit_log \
            ORDER BY id";
        let rows = self.query(SQL, &[]).await.map_err(tracerr::wrap!())?;
        decode_all(&rows)
    }
}
