//! [`Listing`]-related [`Database`] implementations.

use std::collections::HashMap;

use common::operations::{By, Delete, Insert, Lock, Select, Update};
use itertools::Itertools as _;
use postgres_types::ToSql;
use tracerr::Traced;

use crate::{
    domain::{
        listing::{self, Amenities, MaxGuests, RoomCount},
        Listing,
    },
    infra::{
        database::{
            self,
            postgres::{Connection, FuzzPattern},
            Postgres,
        },
        Database,
    },
    read,
};

impl<C, IDs> Database<Select<By<HashMap<listing::Id, Listing>, IDs>>>
    for Postgres<C>
where
    C: Connection,
    IDs: AsRef<[listing::Id]>,
{
    type Ok = HashMap<listing::Id, Listing>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<HashMap<listing::Id, Listing>, IDs>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        // Avoid subtle change for SQL.
        let ids: &[listing::Id] = ids.as_ref();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let limit = i32::try_from(ids.len()).unwrap_or(i32::MAX);

        const SQL: &str = "\
            SELECT id, host_id, \
                   title, description, location, \
                   price_per_night, max_guests, bedrooms, bathrooms, \
                   wifi, parking, pool, kitchen, air_conditioning, \
                   is_available, category, \
                   created_at, updated_at \
            FROM listings \
            WHERE id IN (SELECT unnest($1::UUID[]) LIMIT $2::INT4) \
            LIMIT $2::INT4";
        Ok(self
            .query(SQL, &[&ids, &limit])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| {
                let id = row.get("id");
                let rooms = |col: &str| {
                    RoomCount::from(
                        u16::try_from(row.get::<_, i32>(col))
                            .expect("rooms overflow"),
                    )
                };
                (
                    id,
                    Listing {
                        id,
                        host_id: row.get("host_id"),
                        title: row.get("title"),
                        description: row.get("description"),
                        location: row.get("location"),
                        price_per_night: row.get("price_per_night"),
                        max_guests: u16::try_from(
                            row.get::<_, i32>("max_guests"),
                        )
                        .ok()
                        .and_then(MaxGuests::new)
                        .expect("`max_guests` overflow"),
                        bedrooms: rooms("bedrooms"),
                        bathrooms: rooms("bathrooms"),
                        amenities: Amenities {
                            wifi: row.get("wifi"),
                            parking: row.get("parking"),
                            pool: row.get("pool"),
                            kitchen: row.get("kitchen"),
                            air_conditioning: row.get("air_conditioning"),
                        },
                        is_available: row.get("is_available"),
                        category: row.get("category"),
                        created_at: row.get("created_at"),
                        updated_at: row.get("updated_at"),
                    },
                )
            })
            .collect())
    }
}

impl<C> Database<Select<By<Option<Listing>, listing::Id>>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<HashMap<listing::Id, Listing>, [listing::Id; 1]>>,
        Ok = HashMap<listing::Id, Listing>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<Listing>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Listing>, listing::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .execute(Select(By::new([id])))
            .await
            .map_err(tracerr::wrap!())?
            .remove(&id))
    }
}

impl<C> Database<Insert<Listing>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Listing>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(listing): Insert<Listing>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(listing)).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Listing>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(listing): Update<Listing>,
    ) -> Result<Self::Ok, Self::Err> {
        let Listing {
            id,
            host_id,
            title,
            description,
            location,
            price_per_night,
            max_guests,
            bedrooms,
            bathrooms,
            amenities:
                Amenities {
                    wifi,
                    parking,
                    pool,
                    kitchen,
                    air_conditioning,
                },
            is_available,
            category,
            created_at,
            updated_at,
        } = listing;

        let max_guests = i32::from(max_guests.get());
        let bedrooms = i32::from(u16::from(bedrooms));
        let bathrooms = i32::from(u16::from(bathrooms));

        const SQL: &str = "\
            INSERT INTO listings (\
                id, host_id, \
                title, description, location, \
                price_per_night, max_guests, bedrooms, bathrooms, \
                wifi, parking, pool, kitchen, air_conditioning, \
                is_available, category, \
                created_at, updated_at\
            ) VALUES (\
                $1::UUID, $2::UUID, \
                $3::VARCHAR, $4::TEXT, $5::VARCHAR, \
                $6::NUMERIC, $7::INT4, $8::INT4, $9::INT4, \
                $10::BOOL, $11::BOOL, $12::BOOL, $13::BOOL, $14::BOOL, \
                $15::BOOL, $16::INT2, \
                $17::TIMESTAMPTZ, $18::TIMESTAMPTZ\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET host_id = EXCLUDED.host_id, \
                title = EXCLUDED.title, \
                description = EXCLUDED.description, \
                location = EXCLUDED.location, \
                price_per_night = EXCLUDED.price_per_night, \
                max_guests = EXCLUDED.max_guests, \
                bedrooms = EXCLUDED.bedrooms, \
                bathrooms = EXCLUDED.bathrooms, \
                wifi = EXCLUDED.wifi, \
                parking = EXCLUDED.parking, \
                pool = EXCLUDED.pool, \
                kitchen = EXCLUDED.kitchen, \
                air_conditioning = EXCLUDED.air_conditioning, \
                is_available = EXCLUDED.is_available, \
                category = EXCLUDED.category, \
                created_at = EXCLUDED.created_at, \
                updated_at = EXCLUDED.updated_at";
        self.exec(
            SQL,
            &[
                &id,
                &host_id,
                &title,
                &description,
                &location,
                &price_per_night,
                &max_guests,
                &bedrooms,
                &bathrooms,
                &wifi,
                &parking,
                &pool,
                &kitchen,
                &air_conditioning,
                &is_available,
                &category,
                &created_at,
                &updated_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Lock<By<Listing, listing::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Listing, listing::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: listing::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM listings \
            WHERE id = $1::UUID \
            FOR UPDATE";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Delete<By<Listing, listing::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Listing, listing::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: listing::Id = by.into_inner();

        const SQL: &str = "\
            DELETE FROM listings \
            WHERE id = $1::UUID";
        self.exec(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Delete<By<Listing, ()>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = u64;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(_): Delete<By<Listing, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "DELETE FROM listings";
        self.exec(SQL, &[]).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Select<By<read::listing::RatingSummary, listing::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = read::listing::RatingSummary;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<read::listing::RatingSummary, listing::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let listing_id: listing::Id = by.into_inner();

        const SQL: &str = "\
            SELECT COUNT(*)::INT8 AS total, \
                   COALESCE(SUM(rating), 0)::INT8 AS sum \
            FROM reviews \
            WHERE listing_id = $1::UUID";
        let row = self
            .query_opt(SQL, &[&listing_id])
            .await
            .map_err(tracerr::wrap!())?
            .expect("always exists");
        Ok(read::listing::RatingSummary {
            total_reviews: u32::try_from(row.get::<_, i64>("total"))
                .expect("`total_reviews` overflow"),
            rating_sum: u32::try_from(row.get::<_, i64>("sum"))
                .expect("`rating_sum` overflow"),
        })
    }
}

impl<C>
    Database<
        Select<By<read::listing::list::Page, read::listing::list::Selector>>,
    > for Postgres<C>
where
    C: Connection,
{
    type Ok = read::listing::list::Page;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::listing::list::Page, read::listing::list::Selector>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::listing::list::Selector {
            arguments,
            filter:
                read::listing::list::Filter {
                    location,
                    category,
                    host_id,
                    available_only,
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
        let category_idx = category.as_ref().map(|c| {
            ps.push(c);
            ps.len()
        });
        let host_idx = host_id.as_ref().map(|h| {
            ps.push(h);
            ps.len()
        });
        let location_idx = location.as_ref().map(|l| {
            ps.push(l);
            ps.len()
        });

        let location_pattern =
            location.as_ref().map(|l| FuzzPattern::new(l.as_ref()));
        let location_pattern_idx = location_pattern.as_ref().map(|p| {
            ps.push(p);
            ps.len()
        });

        let sql = format!(
            "SELECT id \
             FROM listings \
             WHERE true \
                   {cursor} \
                   {availability_filtering} \
                   {category_filtering} \
                   {host_filtering} \
                   {location_filtering} \
             ORDER BY {location_ordering} \
                      id {order} \
             LIMIT $1::INT4",
            cursor = cursor_idx.into_iter().format_with("", |idx, f| {
                let op = arguments.direction().operator();
                f(&format_args!("AND id {op} ${idx}::UUID"))
            }),
            order = arguments.direction().order().sql(),
            availability_filtering =
                if available_only { "AND is_available" } else { "" },
            category_filtering =
                category_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!("AND category = ${idx}::INT2"))
                }),
            host_filtering = host_idx.into_iter().format_with("", |idx, f| {
                f(&format_args!("AND host_id = ${idx}::UUID"))
            }),
            location_filtering =
                location_pattern_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!(
                        "AND LOWER(location) SIMILAR TO LOWER(${idx}::VARCHAR)"
                    ))
                }),
            location_ordering =
                location_idx.into_iter().format_with("", |idx, f| {
                    let order = arguments.direction().order().sql();
                    f(&format_args!(
                        "LEVENSHTEIN(location, ${idx}::VARCHAR, 1, 1, 0) \
                         {order},"
                    ))
                })
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

        Ok(read::listing::list::Page::new(&arguments, edges, has_more))
    }
}

impl<C>
    Database<
        Select<
            By<read::listing::list::TotalCount, read::listing::list::Filter>,
        >,
    > for Postgres<C>
where
    C: Connection,
{
    type Ok = read::listing::list::TotalCount;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::listing::list::TotalCount, read::listing::list::Filter>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::listing::list::Filter {
            location,
            category,
            host_id,
            available_only,
        } = by.into_inner();
        let location_pattern =
            location.as_ref().map(|l| FuzzPattern::new(l.as_ref()));

        const SQL: &str = "\
            SELECT COUNT(*)::INT4 \
            FROM listings \
            WHERE (NOT $1::BOOL OR is_available) \
              AND ($2::INT2 IS NULL OR category = $2::INT2) \
              AND ($3::UUID IS NULL OR host_id = $3::UUID) \
              AND ($4::VARCHAR IS NULL \
                   OR LOWER(location) SIMILAR TO LOWER($4::VARCHAR))";
        self.query_opt(
            SQL,
            &[&available_only, &category, &host_id, &location_pattern],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(|row| row.expect("always exists").get::<_, i32>(0).into())
    }
}
