//! [`Command`] for recording a sale of a [`Vehicle`] to a [`Customer`].

use common::{
    operations::{
        By, Commit, Increment, Insert, Lock, Select, Transact, Transacted,
        Update,
    },
    DateTime, Money,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{
        customer, sequence,
        transaction::{self, Sale},
        user, vehicle, Customer, Vehicle,
    },
    infra::{database, Database},
    Service,
};

use super::{next_code, Command};

/// [`Command`] for recording a [`Sale`] of a [`Vehicle`] to a [`Customer`].
///
/// Only a [`Vehicle`] being [`vehicle::Status::ReadyToSell`] or
/// [`vehicle::Status::Reserved`] may be sold. It becomes
/// [`vehicle::Status::Sold`] and remembers the sale details.
#[derive(Clone, Debug)]
pub struct CreateSalesTransaction {
    /// ID of the sold [`Vehicle`].
    pub vehicle_id: vehicle::Id,

    /// ID of the [`Customer`] buying the [`Vehicle`].
    pub customer_id: customer::Id,

    /// Price the [`Vehicle`] is sold for.
    pub vehicle_price: Money,

    /// Tax charged on top of the [`CreateSalesTransaction::vehicle_price`].
    pub tax_amount: Money,

    /// Discount granted to the [`Customer`].
    pub discount_amount: Money,

    /// [`transaction::PaymentMethod`] of the [`Sale`].
    pub payment_method: transaction::PaymentMethod,

    /// Reference of the payment.
    pub payment_reference: Option<transaction::PaymentReference>,

    /// Notes about the [`Sale`].
    pub notes: Option<transaction::Notes>,

    /// ID of the cashier processing the [`Sale`].
    pub cashier_id: user::Id,
}

impl<Db> Command<CreateSalesTransaction> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Vehicle, vehicle::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Vehicle>, vehicle::Id>>,
            Ok = Option<Vehicle>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Customer>, customer::Id>>,
            Ok = Option<Customer>,
            Err = Traced<database::Error>,
        > + Database<
            Increment<By<sequence::Value, sequence::Key>>,
            Ok = sequence::Value,
            Err = Traced<database::Error>,
        > + Database<Insert<Sale>, Err = Traced<database::Error>>
        + Database<Update<Vehicle>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Sale;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateSalesTransaction,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateSalesTransaction {
            vehicle_id,
            customer_id,
            vehicle_price,
            tax_amount,
            discount_amount,
            payment_method,
            payment_reference,
            notes,
            cashier_id,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid selling the same `Vehicle` twice.
        tx.execute(Lock(By::<Vehicle, _>::new(vehicle_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut vehicle = tx
            .execute(Select(By::<Option<Vehicle>, _>::new(vehicle_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::VehicleNotExists(vehicle_id))
            .map_err(tracerr::wrap!())?;
        if !vehicle.is_available_for_sale() {
            return Err(tracerr::new!(E::VehicleNotAvailable(
                vehicle_id,
                vehicle.status,
            )));
        }

        tx.execute(Select(By::<Option<Customer>, _>::new(customer_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .filter(|c| c.is_active)
            .ok_or(E::CustomerNotExists(customer_id))
            .map_err(tracerr::wrap!())
            .map(drop)?;

        let now = DateTime::now();
        let number =
            next_code(&tx, sequence::Key::daily(sequence::Prefix::Sale, &now))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
        let invoice_number = next_code(
            &tx,
            sequence::Key::daily(sequence::Prefix::SaleInvoice, &now),
        )
        .await
        .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let sale = Sale {
            id: transaction::sale::Id::new(),
            number,
            invoice_number,
            vehicle_id,
            customer_id,
            vehicle_price,
            tax_amount,
            discount_amount,
            total_amount: Sale::total(vehicle_price, tax_amount, discount_amount),
            payment_method,
            payment_reference,
            cashier_id,
            status: transaction::Status::Completed,
            notes,
            transacted_at: now.coerce(),
        };
        tx.execute(Insert(sale.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        vehicle.record_sale(&sale);
        tx.execute(Update(vehicle))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        log::info!(
            "`Vehicle(id: {vehicle_id})` sold for {} in `Sale(number: {})`",
            sale.total_amount,
            sale.number,
        );

        Ok(sale)
    }
}

/// Error of [`CreateSalesTransaction`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Customer`] with the provided ID does not exist.
    #[display("`Customer(id: {_0})` does not exist")]
    CustomerNotExists(#[error(not(source))] customer::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Vehicle`] cannot be sold in its current [`vehicle::Status`].
    #[display("`Vehicle(id: {_0})` is `{_1}` and cannot be sold")]
    VehicleNotAvailable(vehicle::Id, vehicle::Status),

    /// [`Vehicle`] with the provided ID does not exist.
    #[display("`Vehicle(id: {_0})` does not exist")]
    VehicleNotExists(#[error(not(source))] vehicle::Id),
}

#[cfg(test)]
mod spec {
    use common::{
        operations::{By, Insert, Select},
        Money,
    };

    use super::{CreateSalesTransaction, ExecutionError};
    use crate::{
        domain::{
            customer, fixture, transaction, user, vehicle, Customer, Vehicle,
        },
        infra::{database::Memory, Database as _},
        Command as _, Service,
    };

    fn command(
        vehicle_id: vehicle::Id,
        customer_id: customer::Id,
        discount: u32,
    ) -> CreateSalesTransaction {
        CreateSalesTransaction {
            vehicle_id,
            customer_id,
            vehicle_price: Money::from(150_000_000),
            tax_amount: Money::from(1_500_000),
            discount_amount: Money::from(discount),
            payment_method: transaction::PaymentMethod::Credit,
            payment_reference: None,
            notes: None,
            cashier_id: user::Id::new(),
        }
    }

    async fn seed(
        svc: &Service<Memory>,
        status: vehicle::Status,
    ) -> (Vehicle, Customer) {
        let vehicle = fixture::vehicle(status);
        let customer = fixture::customer();
        svc.database().execute(Insert(vehicle.clone())).await.unwrap();
        svc.database().execute(Insert(customer.clone())).await.unwrap();
        (vehicle, customer)
    }

    async fn stored(svc: &Service<Memory>, id: vehicle::Id) -> Vehicle {
        svc.database()
            .execute(Select(By::<Option<Vehicle>, _>::new(id)))
            .await
            .unwrap()
            .unwrap()
    }

    #[tokio::test]
    async fn sells_ready_vehicle() {
        let svc = Service::with_database(Memory::new());
        let (vehicle, customer) =
            seed(&svc, vehicle::Status::ReadyToSell).await;

        let sale = svc
            .execute(command(vehicle.id, customer.id, 2_000_000))
            .await
            .unwrap();

        assert_eq!(sale.total_amount, Money::from(149_500_000));
        let vehicle = stored(&svc, vehicle.id).await;
        assert_eq!(vehicle.status, vehicle::Status::Sold);
        assert_eq!(vehicle.final_selling_price, Some(Money::from(150_000_000)));
        assert_eq!(vehicle.sold_to, Some(customer.id));
        assert!(vehicle.sold_at.is_some());
    }

    #[tokio::test]
    async fn sells_reserved_vehicle() {
        let svc = Service::with_database(Memory::new());
        let (vehicle, customer) = seed(&svc, vehicle::Status::Reserved).await;

        _ = svc
            .execute(command(vehicle.id, customer.id, 0))
            .await
            .unwrap();

        assert_eq!(
            stored(&svc, vehicle.id).await.status,
            vehicle::Status::Sold,
        );
    }

    #[tokio::test]
    async fn keeps_negative_total() {
        let svc = Service::with_database(Memory::new());
        let (vehicle, customer) =
            seed(&svc, vehicle::Status::ReadyToSell).await;

        let sale = svc
            .execute(command(vehicle.id, customer.id, 200_000_000))
            .await
            .unwrap();

        assert_eq!(
            sale.total_amount,
            Money::from(151_500_000) - Money::from(200_000_000),
        );
        assert!(sale.total_amount.is_negative());
    }

    #[tokio::test]
    async fn rejects_purchased_vehicle_without_changes() {
        let svc = Service::with_database(Memory::new());
        let (vehicle, customer) = seed(&svc, vehicle::Status::Purchased).await;

        let err = svc
            .execute(command(vehicle.id, customer.id, 0))
            .await
            .unwrap_err();

        assert!(
            matches!(
                err.as_ref(),
                ExecutionError::VehicleNotAvailable(
                    _,
                    vehicle::Status::Purchased,
                ),
            ),
            "unexpected error: {err}",
        );
        let after = stored(&svc, vehicle.id).await;
        assert_eq!(after.status, vehicle::Status::Purchased);
        assert_eq!(after.sold_to, None);
        assert_eq!(after.final_selling_price, None);
        assert_eq!(after.updated_at, vehicle.updated_at);
    }

    #[tokio::test]
    async fn rejects_sold_vehicle() {
        let svc = Service::with_database(Memory::new());
        let (vehicle, customer) = seed(&svc, vehicle::Status::Sold).await;

        let err = svc
            .execute(command(vehicle.id, customer.id, 0))
            .await
            .unwrap_err();

        assert!(
            matches!(err.as_ref(), ExecutionError::VehicleNotAvailable(..)),
            "unexpected error: {err}",
        );
    }
}
