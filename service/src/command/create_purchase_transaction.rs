//! [`Command`] for recording a purchase of a [`Vehicle`] from a [`Customer`].

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
        transaction::{self, Purchase},
        user, vehicle, Customer, Vehicle,
    },
    infra::{database, Database},
    Service,
};

use super::{next_code, Command};

/// [`Command`] for recording a [`Purchase`] of a [`Vehicle`] from a
/// [`Customer`].
///
/// The [`Vehicle`] becomes [`vehicle::Status::Purchased`] and remembers the
/// purchase details.
#[derive(Clone, Debug)]
pub struct CreatePurchaseTransaction {
    /// ID of the purchased [`Vehicle`].
    pub vehicle_id: vehicle::Id,

    /// ID of the [`Customer`] selling the [`Vehicle`].
    pub customer_id: customer::Id,

    /// Price paid for the [`Vehicle`].
    pub vehicle_price: Money,

    /// Tax paid on top of the [`CreatePurchaseTransaction::vehicle_price`].
    pub tax_amount: Money,

    /// [`transaction::PaymentMethod`] of the [`Purchase`].
    pub payment_method: transaction::PaymentMethod,

    /// Reference of the payment.
    pub payment_reference: Option<transaction::PaymentReference>,

    /// Notes about the [`Purchase`].
    pub notes: Option<transaction::Notes>,

    /// ID of the cashier processing the [`Purchase`].
    pub cashier_id: user::Id,
}

impl<Db> Command<CreatePurchaseTransaction> for Service<Db>
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
        > + Database<Insert<Purchase>, Err = Traced<database::Error>>
        + Database<Update<Vehicle>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Purchase;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreatePurchaseTransaction,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreatePurchaseTransaction {
            vehicle_id,
            customer_id,
            vehicle_price,
            tax_amount,
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

        tx.execute(Select(By::<Option<Customer>, _>::new(customer_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .filter(|c| c.is_active)
            .ok_or(E::CustomerNotExists(customer_id))
            .map_err(tracerr::wrap!())
            .map(drop)?;

        let now = DateTime::now();
        let number = next_code(
            &tx,
            sequence::Key::daily(sequence::Prefix::Purchase, &now),
        )
        .await
        .map_err(tracerr::map_from_and_wrap!(=> E))?;
        let invoice_number = next_code(
            &tx,
            sequence::Key::daily(sequence::Prefix::PurchaseInvoice, &now),
        )
        .await
        .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let purchase = Purchase {
            id: transaction::purchase::Id::new(),
            number,
            invoice_number,
            vehicle_id,
            customer_id,
            vehicle_price,
            tax_amount,
            total_amount: Purchase::total(vehicle_price, tax_amount),
            payment_method,
            payment_reference,
            cashier_id,
            status: transaction::Status::Completed,
            notes,
            transacted_at: now.coerce(),
        };
        tx.execute(Insert(purchase.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        vehicle.record_purchase(&purchase);
        tx.execute(Update(vehicle))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        log::info!(
            "`Vehicle(id: {vehicle_id})` purchased for {} in \
             `Purchase(number: {})`",
            purchase.total_amount,
            purchase.number,
        );

        Ok(purchase)
    }
}

/// Error of [`CreatePurchaseTransaction`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Customer`] with the provided ID does not exist.
    #[display("`Customer(id: {_0})` does not exist")]
    CustomerNotExists(#[error(not(source))] customer::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Vehicle`] with the provided ID does not exist.
    #[display("`Vehicle(id: {_0})` does not exist")]
    VehicleNotExists(#[error(not(source))] vehicle::Id),
}

#[cfg(test)]
mod spec {
    use common::{
        operations::{By, Insert, Select},
        DateTime, Money,
    };

    use super::{CreatePurchaseTransaction, ExecutionError};
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
    ) -> CreatePurchaseTransaction {
        CreatePurchaseTransaction {
            vehicle_id,
            customer_id,
            vehicle_price: Money::from(90_000_000),
            tax_amount: Money::from(900_000),
            payment_method: transaction::PaymentMethod::Transfer,
            payment_reference: transaction::PaymentReference::new("TRX-1"),
            notes: None,
            cashier_id: user::Id::new(),
        }
    }

    async fn seed(svc: &Service<Memory>) -> (Vehicle, Customer) {
        let mut vehicle = fixture::vehicle(vehicle::Status::ReadyToSell);
        vehicle.purchase_price = None;
        let customer = fixture::customer();
        svc.database().execute(Insert(vehicle.clone())).await.unwrap();
        svc.database().execute(Insert(customer.clone())).await.unwrap();
        (vehicle, customer)
    }

    #[tokio::test]
    async fn records_purchase_and_writes_it_back() {
        let svc = Service::with_database(Memory::new());
        let (vehicle, customer) = seed(&svc).await;
        let cmd = command(vehicle.id, customer.id);
        let cashier_id = cmd.cashier_id;

        let purchase = svc.execute(cmd).await.unwrap();

        let today = DateTime::now().date_stamp();
        assert_eq!(purchase.number.as_ref(), format!("PUR-{today}-001"));
        assert_eq!(
            purchase.invoice_number.as_ref(),
            format!("INV-PUR-{today}-001"),
        );
        assert_eq!(purchase.total_amount, Money::from(90_900_000));
        assert_eq!(purchase.status, transaction::Status::Completed);

        let vehicle = svc
            .database()
            .execute(Select(By::<Option<Vehicle>, _>::new(vehicle.id)))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(vehicle.status, vehicle::Status::Purchased);
        assert_eq!(vehicle.purchase_price, Some(Money::from(90_000_000)));
        assert_eq!(vehicle.purchased_from, Some(customer.id));
        assert_eq!(vehicle.purchased_by, Some(cashier_id));
    }

    #[tokio::test]
    async fn fails_on_unknown_customer() {
        let svc = Service::with_database(Memory::new());
        let (vehicle, _) = seed(&svc).await;

        let err = svc
            .execute(command(vehicle.id, customer::Id::new()))
            .await
            .unwrap_err();

        assert!(
            matches!(err.as_ref(), ExecutionError::CustomerNotExists(_)),
            "unexpected error: {err}",
        );
        let vehicle = svc
            .database()
            .execute(Select(By::<Option<Vehicle>, _>::new(vehicle.id)))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(vehicle.status, vehicle::Status::ReadyToSell);
    }
}
