//! [`Booking`]-related [`Database`] implementations.

use std::collections::HashMap;

use common::operations::{By, Delete, Insert, Lock, Select, Update};
use itertools::Itertools as _;
use postgres_types::ToSql;
use tracerr::Traced;

use crate::{
    domain::{
        booking::{self, NumGuests, Stay},
        listing, Booking,
    },
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read,
};

impl<C, IDs> Database<Select<By<HashMap<booking::Id, Booking>, IDs>>>
    for Postgres<C>
where
    C: Connection,
    IDs: AsRef<[booking::Id]>,
{
    type Ok = HashMap<booking::Id, Booking>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<HashMap<booking::Id, Booking>, IDs>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        // Avoid subtle change for SQL.
        let ids: &[booking::Id] = ids.as_ref();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let limit = i32::try_from(ids.len()).unwrap_or(i32::MAX);

        const SQL: &str = "\
            SELECT id, listing_id, user_id, \
                   check_in_date, check_out_date, \
                   num_guests, total_price, status, special_requests, \
                   created_at, updated_at \
            FROM bookings \
            WHERE id IN (SELECT unnest($1::UUID[]) LIMIT $2::INT4) \
            LIMIT $2::INT4";
        Ok(self
            .query(SQL, &[&ids, &limit])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| {
                let id = row.get("id");
                (
                    id,
                    Booking {
                        id,
                        listing_id: row.get("listing_id"),
                        user_id: row.get("user_id"),
                        stay: Stay {
                            check_in: row.get("check_in_date"),
                            check_out: row.get("check_out_date"),
                        },
                        num_guests: u16::try_from(
                            row.get::<_, i32>("num_guests"),
                        )
                        .ok()
                        .and_then(NumGuests::new)
                        .expect("`num_guests` overflow"),
                        total_price: row.get("total_price"),
                        status: row.get("status"),
                        special_requests: row.get("special_requests"),
                        created_at: row.get("created_at"),
                        updated_at: row.get("updated_at"),
                    },
                )
            })
            .collect())
    }
}

impl<C> Database<Select<By<Option<Booking>, booking::Id>>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<HashMap<booking::Id, Booking>, [booking::Id; 1]>>,
        Ok = HashMap<booking::Id, Booking>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<Booking>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Booking>, booking::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .execute(Select(By::new([id])))
            .await
            .map_err(tracerr::wrap!())?
            .remove(&id))
    }
}

impl<C> Database<Insert<Booking>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Booking>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(booking): Insert<Booking>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(booking)).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Booking>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(booking): Update<Booking>,
    ) -> Result<Self::Ok, Self::Err> {
        let Booking {
            id,
            listing_id,
            user_id,
            stay: Stay {
                check_in,
                check_out,
            },
            num_guests,
            total_price,
            status,
            special_requests,
            created_at,
            updated_at,
        } = booking;

        let num_guests = i32::from(num_guests.get());

        const SQL: &str = "\
            INSERT INTO bookings (\
                id, listing_id, user_id, \
                check_in_date, check_out_date, \
                num_guests, total_price, status, special_requests, \
                created_at, updated_at\
            ) VALUES (\
                $1::UUID, $2::UUID, $3::UUID, \
                $4::DATE, $5::DATE, \
                $6::INT4, $7::NUMERIC, $8::INT2, $9::TEXT, \
                $10::TIMESTAMPTZ, $11::TIMESTAMPTZ\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET listing_id = EXCLUDED.listing_id, \
                user_id = EXCLUDED.user_id, \
                check_in_date = EXCLUDED.check_in_date, \
                check_out_date = EXCLUDED.check_out_date, \
                num_guests = EXCLUDED.num_guests, \
                total_price = EXCLUDED.total_price, \
                status = EXCLUDED.status, \
                special_requests = EXCLUDED.special_requests, \
                created_at = EXCLUDED.created_at, \
                updated_at = EXCLUDED.updated_at";
        self.exec(
            SQL,
            &[
                &id,
                &listing_id,
                &user_id,
                &check_in,
                &check_out,
                &num_guests,
                &total_price,
                &status,
                &special_requests,
                &created_at,
                &updated_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Lock<By<Booking, booking::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Booking, booking::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: booking::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM bookings \
            WHERE id = $1::UUID \
            FOR UPDATE";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Select<By<read::booking::ActiveStays, listing::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = read::booking::ActiveStays;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<read::booking::ActiveStays, listing::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let listing_id: listing::Id = by.into_inner();

        const SQL: &str = "\
            SELECT check_in_date, check_out_date \
            FROM bookings \
            WHERE listing_id = $1::UUID \
              AND status IN ($2::INT2, $3::INT2) \
            ORDER BY check_in_date ASC";
        Ok(read::booking::ActiveStays(
            self.query(
                SQL,
                &[
                    &listing_id,
                    &booking::Status::Pending,
                    &booking::Status::Confirmed,
                ],
            )
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| Stay {
                check_in: row.get("check_in_date"),
                check_out: row.get("check_out_date"),
            })
            .collect(),
        ))
    }
}

impl<C> Database<Delete<By<Booking, ()>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = u64;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(_): Delete<By<Booking, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "DELETE FROM bookings";
        self.exec(SQL, &[]).await.map_err(tracerr::wrap!())
    }
}

impl<C>
    Database<
        Select<By<read::booking::list::Page, read::booking::list::Selector>>,
    > for Postgres<C>
where
    C: Connection,
{
    type Ok = read::booking::list::Page;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::booking::list::Page, read::booking::list::Selector>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::booking::list::Selector {
            arguments,
            filter:
                read::booking::list::Filter {
                    listing_id,
                    user_id,
                    status,
                },
        } = by.into_inner();

        let limit = i32::try_from(arguments.limit())
            .unwrap_or(i32::MAX - 1)
            + 1;

        let mut ps: Vec<&(dyn ToSql + Sync)> = vec![&limit];

        let cursor_idx = arguments.cursor().map(|c| {
            ps.push(c);
            ps.len()
        });
        let listing_idx = listing_id.as_ref().map(|l| {
            ps.push(l);
            ps.len()
        });
        let user_idx = user_id.as_ref().map(|u| {
            ps.push(u);
            ps.len()
        });
        let status_idx = status.as_ref().map(|s| {
            ps.push(s);
            ps.len()
        });

        let sql = format!(
            "SELECT id \
             FROM bookings \
             WHERE true \
                   {cursor} \
                   {listing_filtering} \
                   {user_filtering} \
                   {status_filtering} \
             ORDER BY id {order} \
             LIMIT $1::INT4",
            cursor = cursor_idx.into_iter().format_with("", |idx, f| {
                let op = arguments.direction().operator();
                f(&format_args!("AND id {op} ${idx}::UUID"))
            }),
            order = arguments.direction().order().sql(),
            listing_filtering =
                listing_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!("AND listing_id = ${idx}::UUID"))
                }),
            user_filtering = user_idx.into_iter().format_with("", |idx, f| {
                f(&format_args!("AND user_id = ${idx}::UUID"))
            }),
            status_filtering =
                status_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!("AND status = ${idx}::INT2"))
                }),
        );
        let rows = self
            .query(&sql, ps.as_slice())
            .await
            .map_err(tracerr::wrap!())?;

        let has_more = rows.len() > arguments.limit();
        let edges = rows
            .into_iter()
            .take(arguments.limit())
            .map(|row| {
                let id = row.get("id");
                (id, id)
            })
            .collect::<Vec<_>>();

        Ok(read::booking::list::Page::new(&arguments, edges, has_more))
    }
}

impl<C>
    Database<
        Select<
            By<read::booking::list::TotalCount, read::booking::list::Filter>,
        >,
    > for Postgres<C>
where
    C: Connection,
{
    type Ok = read::booking::list::TotalCount;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::booking::list::TotalCount, read::booking::list::Filter>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::booking::list::Filter {
            listing_id,
            user_id,
            status,
        } = by.into_inner();

        const SQL: &str = "\
            SELECT COUNT(*)::INT4 \
            FROM bookings \
            WHERE ($1::UUID IS NULL OR listing_id = $1::UUID) \
              AND ($2::UUID IS NULL OR user_id = $2::UUID) \
              AND ($3::INT2 IS NULL OR status = $3::INT2)";
        self.query_opt(SQL, &[&listing_id, &user_id, &status])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.expect("always exists").get::<_, i32>(0).into())
    }
}
