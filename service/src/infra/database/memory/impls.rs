//! [`Database`] implementations for [`Memory`].
//!
//! Locks are no-ops here, since a [`Tx`] holds the whole [`State`]
//! exclusively.
//!
//! [`Tx`]: super::Tx
//! [`State`]: super::State

use std::cmp::Reverse;

use common::{
    operations::{By, Delete, Increment, Insert, Lock, Select, Update},
    pagination::Page,
    DateTime, Money,
};
use tracerr::Traced;

use crate::{
    domain::{
        customer, repair, sequence, spare_part, transaction, user, vehicle,
        Customer, Repair, SparePart, StockMovement, User, Vehicle,
    },
    infra::{database, Database},
    read,
};

use super::{Access, Memory};

/// Implements [`Database`] operations storing whole entities in a map of
/// the [`State`](super::State).
macro_rules! impl_entity {
    ($entity:ty, $id:ty, $field:ident) => {
        impl<A: Access> Database<Select<By<Option<$entity>, $id>>> for Memory<A> {
            type Ok = Option<$entity>;
            type Err = Traced<database::Error>;

            async fn execute(
                &self,
                Select(by): Select<By<Option<$entity>, $id>>,
            ) -> Result<Self::Ok, Self::Err> {
                let id = by.into_inner();
                Ok(self.with(|s| s.$field.get(&id).cloned()).await)
            }
        }

        impl<A: Access> Database<Insert<$entity>> for Memory<A> {
            type Ok = ();
            type Err = Traced<database::Error>;

            async fn execute(
                &self,
                Insert(v): Insert<$entity>,
            ) -> Result<Self::Ok, Self::Err> {
                self.with(|s| drop(s.$field.insert(v.id, v))).await;
                Ok(())
            }
        }
    };
}

/// Implements [`Update`] and [`Lock`] operations for an entity stored by
/// [`impl_entity!`].
macro_rules! impl_mutable_entity {
    ($entity:ty, $id:ty, $field:ident) => {
        impl_entity!($entity, $id, $field);

        impl<A: Access> Database<Update<$entity>> for Memory<A> {
            type Ok = ();
            type Err = Traced<database::Error>;

            async fn execute(
                &self,
                Update(v): Update<$entity>,
            ) -> Result<Self::Ok, Self::Err> {
                self.with(|s| drop(s.$field.insert(v.id, v))).await;
                Ok(())
            }
        }

        impl<A: Access> Database<Lock<By<$entity, $id>>> for Memory<A> {
            type Ok = ();
            type Err = Traced<database::Error>;

            async fn execute(
                &self,
                _: Lock<By<$entity, $id>>,
            ) -> Result<Self::Ok, Self::Err> {
                Ok(())
            }
        }
    };
}

impl_mutable_entity!(Vehicle, vehicle::Id, vehicles);
impl_mutable_entity!(Customer, customer::Id, customers);
impl_mutable_entity!(SparePart, spare_part::Id, spare_parts);
impl_mutable_entity!(Repair, repair::Id, repairs);
impl_entity!(User, user::Id, users);
impl_entity!(repair::Part, repair::part::Id, repair_parts);
impl_entity!(transaction::Purchase, transaction::purchase::Id, purchases);
impl_entity!(transaction::Sale, transaction::sale::Id, sales);

impl<A: Access> Database<Select<By<Option<Vehicle>, vehicle::ChassisNumber>>>
    for Memory<A>
{
    type Ok = Option<Vehicle>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Vehicle>, vehicle::ChassisNumber>>,
    ) -> Result<Self::Ok, Self::Err> {
        let chassis_number = by.into_inner();
        Ok(self
            .with(|s| {
                s.vehicles
                    .values()
                    .find(|v| v.chassis_number == chassis_number)
                    .cloned()
            })
            .await)
    }
}

impl<A: Access> Database<Lock<By<Vehicle, vehicle::ChassisNumber>>>
    for Memory<A>
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Lock<By<Vehicle, vehicle::ChassisNumber>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(())
    }
}

impl<A: Access> Database<Delete<By<Vehicle, vehicle::Id>>> for Memory<A> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Vehicle, vehicle::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.with(|s| drop(s.vehicles.remove(&id))).await;
        Ok(())
    }
}

impl<A: Access> Database<Select<By<read::vehicle::HasHistory, vehicle::Id>>>
    for Memory<A>
{
    type Ok = read::vehicle::HasHistory;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<read::vehicle::HasHistory, vehicle::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(read::vehicle::HasHistory(
            self.with(|s| {
                s.repairs.values().any(|r| r.vehicle_id == id)
                    || s.purchases.values().any(|p| p.vehicle_id == id)
                    || s.sales.values().any(|p| p.vehicle_id == id)
            })
            .await,
        ))
    }
}

impl<A: Access>
    Database<
        Select<By<read::vehicle::list::Page, read::vehicle::list::Selector>>,
    > for Memory<A>
{
    type Ok = read::vehicle::list::Page;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::vehicle::list::Page, read::vehicle::list::Selector>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::vehicle::list::Selector {
            arguments,
            filter: read::vehicle::list::Filter { search, status },
        } = by.into_inner();

        let mut all = self
            .with(|s| {
                s.vehicles
                    .values()
                    .filter(|v| status.map_or(true, |st| v.status == st))
                    .filter(|v| {
                        search.as_ref().map_or(true, |q| {
                            q.matches_any([
                                Some(v.code.as_ref()),
                                Some(v.chassis_number.as_ref()),
                                v.license_plate.as_ref().map(AsRef::as_ref),
                                Some(v.brand.as_ref()),
                                Some(v.model.as_ref()),
                            ])
                        })
                    })
                    .cloned()
                    .collect::<Vec<_>>()
            })
            .await;
        all.sort_by_key(|v| Reverse((v.created_at, v.code.to_string())));

        Ok(Page::slice(arguments, all))
    }
}

impl<A: Access>
    Database<
        Select<By<read::customer::list::Page, read::customer::list::Selector>>,
    > for Memory<A>
{
    type Ok = read::customer::list::Page;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::customer::list::Page, read::customer::list::Selector>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::customer::list::Selector {
            arguments,
            filter: read::customer::list::Filter { search, kind },
        } = by.into_inner();

        let mut all = self
            .with(|s| {
                s.customers
                    .values()
                    .filter(|c| c.is_active)
                    .filter(|c| kind.map_or(true, |k| c.kind == k))
                    .filter(|c| {
                        search.as_ref().map_or(true, |q| {
                            q.matches_any([
                                Some(c.code.as_ref()),
                                Some(c.name.as_ref()),
                                c.phone.as_ref().map(AsRef::as_ref),
                                c.email.as_ref().map(AsRef::as_ref),
                            ])
                        })
                    })
                    .cloned()
                    .collect::<Vec<_>>()
            })
            .await;
        all.sort_by_key(|c| Reverse((c.created_at, c.code.to_string())));

        Ok(Page::slice(arguments, all))
    }
}

impl<A: Access>
    Database<
        Select<
            By<read::spare_part::list::Page, read::spare_part::list::Selector>,
        >,
    > for Memory<A>
{
    type Ok = read::spare_part::list::Page;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::spare_part::list::Page, read::spare_part::list::Selector>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::spare_part::list::Selector {
            arguments,
            filter:
                read::spare_part::list::Filter {
                    search,
                    low_stock_only,
                    include_inactive,
                },
        } = by.into_inner();

        let mut all = self
            .with(|s| {
                s.spare_parts
                    .values()
                    .filter(|p| include_inactive || p.is_active)
                    .filter(|p| !low_stock_only || p.is_low_on_stock())
                    .filter(|p| {
                        search.as_ref().map_or(true, |q| {
                            q.matches_any([
                                Some(p.code.as_ref()),
                                Some(p.name.as_ref()),
                                p.brand.as_ref().map(AsRef::as_ref),
                            ])
                        })
                    })
                    .cloned()
                    .collect::<Vec<_>>()
            })
            .await;
        all.sort_by_key(|p| Reverse((p.created_at, p.code.to_string())));

        Ok(Page::slice(arguments, all))
    }
}

impl<A: Access>
    Database<Select<By<Vec<SparePart>, read::spare_part::LowStock>>>
    for Memory<A>
{
    type Ok = Vec<SparePart>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<SparePart>, read::spare_part::LowStock>>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut parts = self
            .with(|s| {
                s.spare_parts
                    .values()
                    .filter(|p| p.is_active && p.is_low_on_stock())
                    .cloned()
                    .collect::<Vec<_>>()
            })
            .await;
        parts.sort_by_key(|p| p.code.to_string());
        Ok(parts)
    }
}

impl<A: Access>
    Database<
        Select<By<read::repair::list::Page, read::repair::list::Selector>>,
    > for Memory<A>
{
    type Ok = read::repair::list::Page;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::repair::list::Page, read::repair::list::Selector>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::repair::list::Selector {
            arguments,
            filter:
                read::repair::list::Filter {
                    search,
                    status,
                    vehicle_id,
                },
        } = by.into_inner();

        let mut all = self
            .with(|s| {
                s.repairs
                    .values()
                    .filter(|r| status.map_or(true, |st| r.status == st))
                    .filter(|r| vehicle_id.map_or(true, |id| r.vehicle_id == id))
                    .filter(|r| {
                        search.as_ref().map_or(true, |q| {
                            q.matches_any([
                                Some(r.number.as_ref()),
                                Some(r.title.as_ref()),
                            ])
                        })
                    })
                    .cloned()
                    .collect::<Vec<_>>()
            })
            .await;
        all.sort_by_key(|r| Reverse((r.created_at, r.number.to_string())));

        Ok(Page::slice(arguments, all))
    }
}

impl<A: Access> Database<Select<By<Vec<repair::Part>, repair::Id>>>
    for Memory<A>
{
    type Ok = Vec<repair::Part>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<repair::Part>, repair::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let repair_id = by.into_inner();
        let mut parts = self
            .with(|s| {
                s.repair_parts
                    .values()
                    .filter(|p| p.repair_id == repair_id)
                    .cloned()
                    .collect::<Vec<_>>()
            })
            .await;
        parts.sort_by_key(|p| p.used_at);
        Ok(parts)
    }
}

impl<A: Access> Database<Delete<By<repair::Part, repair::part::Id>>>
    for Memory<A>
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<repair::Part, repair::part::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.with(|s| drop(s.repair_parts.remove(&id))).await;
        Ok(())
    }
}

impl<A: Access> Database<Insert<StockMovement>> for Memory<A> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(movement): Insert<StockMovement>,
    ) -> Result<Self::Ok, Self::Err> {
        self.with(|s| s.stock_movements.push(movement)).await;
        Ok(())
    }
}

impl<A: Access> Database<Select<By<Vec<StockMovement>, spare_part::Id>>>
    for Memory<A>
{
    type Ok = Vec<StockMovement>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<StockMovement>, spare_part::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .with(|s| {
                s.stock_movements
                    .iter()
                    .rev()
                    .filter(|m| m.spare_part_id == id)
                    .cloned()
                    .collect()
            })
            .await)
    }
}

/// Implements [`Select`]ing a [`Page`] of transactions for [`Memory`].
macro_rules! impl_transaction_list {
    ($($list:ident)::+, $field:ident) => {
        impl<A: Access>
            Database<Select<By<$($list)::+::Page, $($list)::+::Selector>>>
            for Memory<A>
        {
            type Ok = $($list)::+::Page;
            type Err = Traced<database::Error>;

            async fn execute(
                &self,
                Select(by): Select<
                    By<$($list)::+::Page, $($list)::+::Selector>,
                >,
            ) -> Result<Self::Ok, Self::Err> {
                let common::pagination::Selector {
                    arguments,
                    filter:
                        read::transaction::Filter {
                            vehicle_id,
                            customer_id,
                        },
                } = by.into_inner();

                let mut all = self
                    .with(|s| {
                        s.$field
                            .values()
                            .filter(|t| {
                                vehicle_id.map_or(true, |id| t.vehicle_id == id)
                            })
                            .filter(|t| {
                                customer_id
                                    .map_or(true, |id| t.customer_id == id)
                            })
                            .cloned()
                            .collect::<Vec<_>>()
                    })
                    .await;
                all.sort_by_key(|t| {
                    Reverse((t.transacted_at, t.number.to_string()))
                });

                Ok(Page::slice(arguments, all))
            }
        }
    };
}

impl_transaction_list!(read::transaction::purchase::list, purchases);
impl_transaction_list!(read::transaction::sale::list, sales);

impl<A: Access> Database<Increment<By<sequence::Value, sequence::Key>>>
    for Memory<A>
{
    type Ok = sequence::Value;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Increment(by): Increment<By<sequence::Value, sequence::Key>>,
    ) -> Result<Self::Ok, Self::Err> {
        let key = by.into_inner();
        Ok(self
            .with(|s| {
                let n = s.sequences.entry(key).or_default();
                *n += 1;
                sequence::Value(*n)
            })
            .await)
    }
}

impl<A: Access> Database<Select<By<read::dashboard::Stats, DateTime>>>
    for Memory<A>
{
    type Ok = read::dashboard::Stats;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<read::dashboard::Stats, DateTime>>,
    ) -> Result<Self::Ok, Self::Err> {
        let now = by.into_inner();
        let (day, month) = (now.start_of_day(), now.start_of_month());
        let count = |n: usize| u64::try_from(n).unwrap_or(u64::MAX);

        Ok(self
            .with(|s| {
                let vehicles_in = |st: vehicle::Status| {
                    count(s.vehicles.values().filter(|v| v.status == st).count())
                };
                let sales_since = |since: DateTime| {
                    s.sales
                        .values()
                        .filter(|t| t.transacted_at.coerce::<()>() >= since)
                        .fold((0, Money::ZERO), |(n, sum), t| {
                            (n + 1, sum + t.total_amount)
                        })
                };
                let purchases_today = s
                    .purchases
                    .values()
                    .filter(|t| t.transacted_at.coerce::<()>() >= day)
                    .count();
                let (sales_today, today_revenue) = sales_since(day);
                let (_, monthly_revenue) = sales_since(month);

                read::dashboard::Stats {
                    total_vehicles: count(s.vehicles.len()),
                    vehicles_for_sale: vehicles_in(vehicle::Status::ReadyToSell),
                    vehicles_in_repair: vehicles_in(vehicle::Status::InRepair),
                    vehicles_sold: vehicles_in(vehicle::Status::Sold),
                    total_customers: count(
                        s.customers.values().filter(|c| c.is_active).count(),
                    ),
                    today_purchases: count(purchases_today),
                    today_sales: sales_today,
                    today_revenue,
                    monthly_revenue,
                    total_profit: s
                        .sales
                        .values()
                        .map(|t| t.total_amount)
                        .sum::<Money>()
                        - s.purchases
                            .values()
                            .map(|t| t.total_amount)
                            .sum::<Money>(),
                }
            })
            .await)
    }
}
