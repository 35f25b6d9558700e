//! [`Command`] for creating a new [`Customer`].

use common::{
    operations::{By, Commit, Increment, Insert, Transact, Transacted},
    DateTime,
};
use tracerr::Traced;

use crate::{
    domain::{customer, sequence, Customer},
    infra::{database, Database},
    Service,
};

use super::{next_code, Command};

/// [`Command`] for creating a new [`Customer`].
#[derive(Clone, Debug)]
pub struct CreateCustomer {
    /// Name of the new [`Customer`].
    pub name: customer::Name,

    /// Phone number of the new [`Customer`].
    pub phone: Option<customer::Phone>,

    /// Email of the new [`Customer`].
    pub email: Option<customer::Email>,

    /// Address of the new [`Customer`].
    pub address: Option<customer::Address>,

    /// Identity card number of the new [`Customer`].
    pub id_card_number: Option<customer::IdCardNumber>,

    /// [`customer::Kind`] of the new [`Customer`].
    pub kind: customer::Kind,
}

impl<Db> Command<CreateCustomer> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Increment<By<sequence::Value, sequence::Key>>,
            Ok = sequence::Value,
            Err = Traced<database::Error>,
        > + Database<Insert<Customer>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Customer;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateCustomer) -> Result<Self::Ok, Self::Err> {
        let CreateCustomer {
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
            .map_err(tracerr::wrap!())?;

        let code =
            next_code(&tx, sequence::Key::global(sequence::Prefix::Customer))
                .await
                .map_err(tracerr::wrap!())?;

        let now = DateTime::now();
        let customer = Customer {
            id: customer::Id::new(),
            code,
            name,
            phone,
            email,
            address,
            id_card_number,
            kind,
            created_at: now.coerce(),
            updated_at: now.coerce(),
            is_active: true,
        };

        tx.execute(Insert(customer.clone()))
            .await
            .map_err(tracerr::wrap!())
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::wrap!())
            .map(drop)?;

        Ok(customer)
    }
}

/// Error of [`CreateCustomer`] [`Command`] execution.
pub type ExecutionError = database::Error;

#[cfg(test)]
mod spec {
    use super::CreateCustomer;
    use crate::{
        domain::customer,
        infra::database::Memory,
        Command as _, Service,
    };

    #[tokio::test]
    async fn generates_sequential_codes() {
        let svc = Service::with_database(Memory::new());
        let cmd = CreateCustomer {
            name: customer::Name::new("PT Maju Jaya").unwrap(),
            phone: None,
            email: customer::Email::new("sales@majujaya.co.id"),
            address: None,
            id_card_number: None,
            kind: customer::Kind::Corporate,
        };

        let first = svc.execute(cmd.clone()).await.unwrap();
        let second = svc.execute(cmd).await.unwrap();

        assert_eq!(first.code.as_ref(), "CUST-001");
        assert_eq!(second.code.as_ref(), "CUST-002");
        assert!(first.is_active);
    }
}
