//! [`Command`] for updating a [`Customer`].

use common::operations::{By, Commit, Lock, Select, Transact, Transacted, Update};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{customer, Customer},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for overwriting data of an active [`Customer`].
#[derive(Clone, Debug)]
pub struct UpdateCustomer {
    /// ID of the [`Customer`] to be updated.
    pub customer_id: customer::Id,

    /// New name of the [`Customer`].
    pub name: customer::Name,

    /// New phone number of the [`Customer`].
    pub phone: Option<customer::Phone>,

    /// New email of the [`Customer`].
    pub email: Option<customer::Email>,

    /// New address of the [`Customer`].
    pub address: Option<customer::Address>,

    /// New identity card number of the [`Customer`].
    pub id_card_number: Option<customer::IdCardNumber>,

    /// New [`customer::Kind`] of the [`Customer`].
    pub kind: customer::Kind,
}

impl<Db> Command<UpdateCustomer> for Service<Db>
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

    async fn execute(&self, cmd: UpdateCustomer) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateCustomer {
            customer_id,
            name,
            phone,
            email,
            address,
            id_card_number,
            kind,
        } = cmd;

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

        customer.name = name;
        customer.phone = phone;
        customer.email = email;
        customer.address = address;
        customer.id_card_number = id_card_number;
        customer.kind = kind;
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

/// Error of [`UpdateCustomer`] [`Command`] execution.
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
    use common::operations::Insert;

    use super::UpdateCustomer;
    use crate::{
        domain::{customer, fixture},
        infra::{database::Memory, Database as _},
        Command as _, Service,
    };

    #[tokio::test]
    async fn overwrites_fields_but_code() {
        let svc = Service::with_database(Memory::new());
        let customer = fixture::customer();
        svc.database().execute(Insert(customer.clone())).await.unwrap();

        let updated = svc
            .execute(UpdateCustomer {
                customer_id: customer.id,
                name: customer::Name::new("Budi S.").unwrap(),
                phone: None,
                email: None,
                address: customer::Address::new("Jl. Sudirman 1, Jakarta"),
                id_card_number: None,
                kind: customer::Kind::Individual,
            })
            .await
            .unwrap();

        assert_eq!(updated.name.as_ref(), "Budi S.");
        assert_eq!(updated.email, None);
        assert_eq!(updated.code, customer.code);
    }
}
