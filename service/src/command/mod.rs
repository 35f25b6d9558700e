//! [`Command`] definition.

pub mod add_repair_part;
pub mod adjust_spare_part_stock;
pub mod approve_vehicle_price;
pub mod create_customer;
pub mod create_purchase_transaction;
pub mod create_repair;
pub mod create_sales_transaction;
pub mod create_spare_part;
pub mod create_vehicle;
pub mod delete_customer;
pub mod delete_spare_part;
pub mod delete_vehicle;
pub mod remove_repair_part;
pub mod update_customer;
pub mod update_repair;
pub mod update_repair_status;
pub mod update_spare_part;
pub mod update_vehicle;
pub mod update_vehicle_status;

use common::operations::{By, Increment};
use tracerr::Traced;

use crate::{
    domain::sequence,
    infra::{database, Database},
};

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    add_repair_part::AddRepairPart,
    adjust_spare_part_stock::AdjustSparePartStock,
    approve_vehicle_price::ApproveVehiclePrice,
    create_customer::CreateCustomer,
    create_purchase_transaction::CreatePurchaseTransaction,
    create_repair::CreateRepair,
    create_sales_transaction::CreateSalesTransaction,
    create_spare_part::CreateSparePart, create_vehicle::CreateVehicle,
    delete_customer::DeleteCustomer, delete_spare_part::DeleteSparePart,
    delete_vehicle::DeleteVehicle, remove_repair_part::RemoveRepairPart,
    update_customer::UpdateCustomer, update_repair::UpdateRepair,
    update_repair_status::UpdateRepairStatus,
    update_spare_part::UpdateSparePart, update_vehicle::UpdateVehicle,
    update_vehicle_status::UpdateVehicleStatus,
};

/// Generates the next [`sequence::Code`] of the provided [`sequence::Key`]
/// counter.
async fn next_code<Of: ?Sized, Db>(
    db: &Db,
    key: sequence::Key,
) -> Result<sequence::Code<Of>, Traced<database::Error>>
where
    Db: Database<
        Increment<By<sequence::Value, sequence::Key>>,
        Ok = sequence::Value,
        Err = Traced<database::Error>,
    >,
{
    let value = db
        .execute(Increment(By::new(key.clone())))
        .await
        .map_err(tracerr::wrap!())?;
    Ok(key.code(value))
}
