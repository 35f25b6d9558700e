//! [`Command`] for deleting a [`Customer`].

use common::operations::{By, Commit, Lock, Select, Transact, Transacted, Update};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{customer, Customer},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for deactivating a [`Customer`].
///
/// Transactions of the [`Customer`] keep referencing it.
#[derive(Clone, Copy, Debug)]
pub struct DeleteCustomer {
    /// ID of the [`Customer`] to be deleted.
    pub customer_id: customer::Id,
}

impl<Db> Command<DeleteCustomer> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Customer, customer::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Customer>, customer::Id>>,
            Ok = Option<Customer>,
            Err = Traced<database::Error>,
        > + Database<Update<Customer>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Customer;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: DeleteCustomer) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeleteCustomer { customer_id } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Lock(By::<Customer, _>::new(customer_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut customer = tx
            .execute(Select(By::<Option<Customer>, _>::new(customer_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .filter(|c| c.is_active)
            .ok_or(E::CustomerNotExists(customer_id))
            .map_err(tracerr::wrap!())?;

        customer.is_active = false;
        customer.touch();

        tx.execute(Update(customer.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(customer)
    }
}

/// Error of [`DeleteCustomer`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Customer`] with the provided ID does not exist.
    #[display("`Customer(id: {_0})` does not exist")]
    CustomerNotExists(#[error(not(source))] customer::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),
}

#[cfg(test)]
mod spec {
    use common::operations::{By, Insert, Select};

    use super::DeleteCustomer;
    use crate::{
        domain::{fixture, Customer},
        infra::{database::Memory, Database as _},
        Command as _, Service,
    };

    #[tokio::test]
    async fn deactivates_customer() {
        let svc = Service::with_database(Memory::new());
        let customer = fixture::customer();
        svc.database().execute(Insert(customer.clone())).await.unwrap();

        _ = svc
            .execute(DeleteCustomer {
                customer_id: customer.id,
            })
            .await
            .unwrap();

        let stored = svc
            .database()
            .execute(Select(By::<Option<Customer>, _>::new(customer.id)))
            .await
            .unwrap()
            .unwrap();
        assert!(!stored.is_active);
    }
}
