//! [`Review`]-related [`Database`] implementations.

use std::collections::HashMap;

use common::operations::{By, Delete, Insert, Select, Update};
use itertools::Itertools as _;
use postgres_types::ToSql;
use tracerr::Traced;

use crate::{
    domain::{
        booking, listing,
        review::{self, Rating},
        user, Review,
    },
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read,
};

impl<C, IDs> Database<Select<By<HashMap<review::Id, Review>, IDs>>>
    for Postgres<C>
where
    C: Connection,
    IDs: AsRef<[review::Id]>,
{
    type Ok = HashMap<review::Id, Review>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<HashMap<review::Id, Review>, IDs>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        // Avoid subtle change for SQL.
        let ids: &[review::Id] = ids.as_ref();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let limit = i32::try_from(ids.len()).unwrap_or(i32::MAX);

        const SQL: &str = "\
            SELECT id, listing_id, user_id, booking_id, \
                   rating, comment, \
                   created_at, updated_at \
            FROM reviews \
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
                    Review {
                        id,
                        listing_id: row.get("listing_id"),
                        user_id: row.get("user_id"),
                        booking_id: row.get("booking_id"),
                        rating: Rating::new(row.get("rating"))
                            .expect("`rating` out of range"),
                        comment: row.get("comment"),
                        created_at: row.get("created_at"),
                        updated_at: row.get("updated_at"),
                    },
                )
            })
            .collect())
    }
}

impl<C> Database<Select<By<Option<Review>, review::Id>>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<HashMap<review::Id, Review>, [review::Id; 1]>>,
        Ok = HashMap<review::Id, Review>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<Review>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Review>, review::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .execute(Select(By::new([id])))
            .await
            .map_err(tracerr::wrap!())?
            .remove(&id))
    }
}

impl<C> Database<Insert<Review>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Review>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(review): Insert<Review>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(review)).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Review>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(review): Update<Review>,
    ) -> Result<Self::Ok, Self::Err> {
        let Review {
            id,
            listing_id,
            user_id,
            booking_id,
            rating,
            comment,
            created_at,
            updated_at,
        } = review;

        let rating = i32::from(rating.stars());

        const SQL: &str = "\
            INSERT INTO reviews (\
                id, listing_id, user_id, booking_id, \
                rating, comment, \
                created_at, updated_at\
            ) VALUES (\
                $1::UUID, $2::UUID, $3::UUID, $4::UUID, \
                $5::INT4, $6::TEXT, \
                $7::TIMESTAMPTZ, $8::TIMESTAMPTZ\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET listing_id = EXCLUDED.listing_id, \
                user_id = EXCLUDED.user_id, \
                booking_id = EXCLUDED.booking_id, \
                rating = EXCLUDED.rating, \
                comment = EXCLUDED.comment, \
                created_at = EXCLUDED.created_at, \
                updated_at = EXCLUDED.updated_at";
        self.exec(
            SQL,
            &[
                &id,
                &listing_id,
                &user_id,
                &booking_id,
                &rating,
                &comment,
                &created_at,
                &updated_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Select<By<review::History, (user::Id, listing::Id)>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = review::History;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<review::History, (user::Id, listing::Id)>>,
    ) -> Result<Self::Ok, Self::Err> {
        let (user_id, listing_id) = by.into_inner();

        const BOOKINGS_SQL: &str = "\
            SELECT id \
            FROM bookings \
            WHERE user_id = $1::UUID \
              AND listing_id = $2::UUID \
              AND status = $3::INT2 \
            ORDER BY check_out_date DESC, id DESC";
        let completed_bookings = self
            .query(
                BOOKINGS_SQL,
                &[&user_id, &listing_id, &booking::Status::Completed],
            )
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| row.get("id"))
            .collect();

        const REVIEW_SQL: &str = "\
            SELECT id \
            FROM reviews \
            WHERE user_id = $1::UUID \
              AND listing_id = $2::UUID \
            LIMIT 1";
        let existing_review = self
            .query_opt(REVIEW_SQL, &[&user_id, &listing_id])
            .await
            .map_err(tracerr::wrap!())?
            .map(|row| row.get("id"));

        Ok(review::History {
            completed_bookings,
            existing_review,
        })
    }
}

impl<C> Database<Delete<By<Review, ()>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = u64;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(_): Delete<By<Review, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "DELETE FROM reviews";
        self.exec(SQL, &[]).await.map_err(tracerr::wrap!())
    }
}

impl<C>
    Database<
        Select<By<read::review::list::Page, read::review::list::Selector>>,
    > for Postgres<C>
where
    C: Connection,
{
    type Ok = read::review::list::Page;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::review::list::Page, read::review::list::Selector>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::review::list::Selector {
            arguments,
            filter: read::review::list::Filter {
                listing_id,
                user_id,
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

        let sql = format!(
            "SELECT id \
             FROM reviews \
             WHERE true \
                   {cursor} \
                   {listing_filtering} \
                   {user_filtering} \
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

        Ok(read::review::list::Page::new(&arguments, edges, has_more))
    }
}

impl<C>
    Database<
        Select<By<read::review::list::TotalCount, read::review::list::Filter>>,
    > for Postgres<C>
where
    C: Connection,
{
    type Ok = read::review::list::TotalCount;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::review::list::TotalCount, read::review::list::Filter>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::review::list::Filter {
            listing_id,
            user_id,
        } = by.into_inner();

        const SQL: &str = "\
            SELECT COUNT(*)::INT4 \
            FROM reviews \
            WHERE ($1::UUID IS NULL OR listing_id = $1::UUID) \
              AND ($2::UUID IS NULL OR user_id = $2::UUID)";
        self.query_opt(SQL, &[&listing_id, &user_id])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.expect("always exists").get::<_, i32>(0).into())
    }
}
