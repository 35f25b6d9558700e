//! GraphQL [`Mutation`]s definitions.

use std::fmt;

use common::Money;
use juniper::graphql_object;
use service::{command, Command as _};

use crate::{api, define_error, AsError, Context, Error};

/// Root of all GraphQL mutations.
#[derive(Clone, Copy, Debug)]
pub struct Mutation;

impl Mutation {
    /// Name of the [`tracing::Span`] for the mutations.
    const SPAN_NAME: &'static str = "GraphQL mutation";
}

#[graphql_object(context = Context)]
impl Mutation {
    /// Registers a new `Vehicle` acquired by the showroom.
    ///
    /// The `Vehicle` starts in the `PURCHASED` status.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `VALIDATION_FAILED` - provided year, mileage or price is invalid;
    /// - `CHASSIS_NUMBER_OCCUPIED` - another `Vehicle` has the provided
    ///                               chassis number;
    /// - `CUSTOMER_NOT_EXISTS` - the `Customer` the `Vehicle` is purchased
    ///                           from does not exist.
    #[expect(clippy::too_many_arguments, reason = "GraphQL input")]
    #[tracing::instrument(
        skip_all,
        fields(
            brand = %brand,
            chassis_number = %chassis_number,
            gql.name = "createVehicle",
            model = %model,
            otel.name = Self::SPAN_NAME,
            year = %year,
        ),
    )]
    pub async fn create_vehicle(
        chassis_number: api::vehicle::ChassisNumber,
        license_plate: Option<api::vehicle::LicensePlate>,
        brand: api::vehicle::Brand,
        model: api::vehicle::Model,
        variant: Option<api::vehicle::Variant>,
        year: i32,
        color: Option<api::vehicle::Color>,
        mileage: Option<i32>,
        fuel_type: Option<api::vehicle::FuelType>,
        transmission: Option<api::vehicle::Transmission>,
        purchase_price: Option<Money>,
        suggested_selling_price: Option<Money>,
        purchased_from: Option<api::customer::Id>,
        purchased_by: Option<api::user::Id>,
        purchase_notes: Option<api::vehicle::Notes>,
        condition_notes: Option<api::vehicle::Notes>,
        ctx: &Context,
    ) -> Result<api::Vehicle, Error> {
        let year = api::vehicle::year(year).map_err(ctx.error())?;
        let mileage =
            mileage.map(api::count).transpose().map_err(ctx.error())?;
        let purchase_price = purchase_price
            .map(api::amount)
            .transpose()
            .map_err(ctx.error())?;
        let suggested_selling_price = suggested_selling_price
            .map(api::amount)
            .transpose()
            .map_err(ctx.error())?;

        ctx.service()
            .execute(command::CreateVehicle {
                chassis_number: chassis_number.into(),
                license_plate: license_plate.map(Into::into),
                brand: brand.into(),
                model: model.into(),
                variant: variant.map(Into::into),
                year,
                color: color.map(Into::into),
                mileage,
                fuel_type: fuel_type.map(Into::into),
                transmission: transmission.map(Into::into),
                purchase_price,
                suggested_selling_price,
                purchased_from: purchased_from.map(Into::into),
                purchased_by: purchased_by.map(Into::into),
                purchase_notes: purchase_notes.map(Into::into),
                condition_notes: condition_notes.map(Into::into),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Updates the descriptive data of the `Vehicle` with the provided ID.
    ///
    /// Status, prices other than the suggested one, and the purchase and sale
    /// references are not affected.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `VALIDATION_FAILED` - provided year, mileage or price is invalid;
    /// - `VEHICLE_NOT_EXISTS` - the `Vehicle` does not exist.
    #[expect(clippy::too_many_arguments, reason = "GraphQL input")]
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "updateVehicle",
            otel.name = Self::SPAN_NAME,
            vehicle_id = %vehicle_id,
        ),
    )]
    pub async fn update_vehicle(
        vehicle_id: api::vehicle::Id,
        license_plate: Option<api::vehicle::LicensePlate>,
        brand: api::vehicle::Brand,
        model: api::vehicle::Model,
        variant: Option<api::vehicle::Variant>,
        year: i32,
        color: Option<api::vehicle::Color>,
        mileage: Option<i32>,
        fuel_type: Option<api::vehicle::FuelType>,
        transmission: Option<api::vehicle::Transmission>,
        suggested_selling_price: Option<Money>,
        purchase_notes: Option<api::vehicle::Notes>,
        condition_notes: Option<api::vehicle::Notes>,
        ctx: &Context,
    ) -> Result<api::Vehicle, Error> {
        let year = api::vehicle::year(year).map_err(ctx.error())?;
        let mileage =
            mileage.map(api::count).transpose().map_err(ctx.error())?;
        let suggested_selling_price = suggested_selling_price
            .map(api::amount)
            .transpose()
            .map_err(ctx.error())?;

        ctx.service()
            .execute(command::UpdateVehicle {
                vehicle_id: vehicle_id.into(),
                license_plate: license_plate.map(Into::into),
                brand: brand.into(),
                model: model.into(),
                variant: variant.map(Into::into),
                year,
                color: color.map(Into::into),
                mileage,
                fuel_type: fuel_type.map(Into::into),
                transmission: transmission.map(Into::into),
                suggested_selling_price,
                purchase_notes: purchase_notes.map(Into::into),
                condition_notes: condition_notes.map(Into::into),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Sets the status of the `Vehicle` with the provided ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `VEHICLE_NOT_EXISTS` - the `Vehicle` does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "updateVehicleStatus",
            otel.name = Self::SPAN_NAME,
            status = ?status,
            vehicle_id = %vehicle_id,
        ),
    )]
    pub async fn update_vehicle_status(
        vehicle_id: api::vehicle::Id,
        status: api::vehicle::Status,
        ctx: &Context,
    ) -> Result<api::Vehicle, Error> {
        ctx.service()
            .execute(command::UpdateVehicleStatus {
                vehicle_id: vehicle_id.into(),
                status: status.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Deletes the `Vehicle` with the provided ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `VEHICLE_HAS_HISTORY` - the `Vehicle` is referenced by a `Repair`,
    ///                           a `Purchase` or a `Sale`;
    /// - `VEHICLE_NOT_EXISTS` - the `Vehicle` does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "deleteVehicle",
            otel.name = Self::SPAN_NAME,
            vehicle_id = %vehicle_id,
        ),
    )]
    pub async fn delete_vehicle(
        vehicle_id: api::vehicle::Id,
        ctx: &Context,
    ) -> Result<api::Vehicle, Error> {
        ctx.service()
            .execute(command::DeleteVehicle {
                vehicle_id: vehicle_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Approves the selling price of the `Vehicle` with the provided ID on
    /// behalf of the `User` with the `ADMIN` role.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `VALIDATION_FAILED` - provided price is negative, too large or finer
    ///                         than a cent;
    /// - `USER_NOT_ADMIN` - the approving `User` is not an active admin;
    /// - `USER_NOT_EXISTS` - the approving `User` does not exist;
    /// - `VEHICLE_NOT_EXISTS` - the `Vehicle` does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            admin_id = %admin_id,
            gql.name = "approveVehiclePrice",
            otel.name = Self::SPAN_NAME,
            price = %price,
            vehicle_id = %vehicle_id,
        ),
    )]
    pub async fn approve_vehicle_price(
        vehicle_id: api::vehicle::Id,
        price: Money,
        admin_id: api::user::Id,
        ctx: &Context,
    ) -> Result<api::Vehicle, Error> {
        let price = api::amount(price).map_err(ctx.error())?;

        ctx.service()
            .execute(command::ApproveVehiclePrice {
                vehicle_id: vehicle_id.into(),
                price,
                admin_id: admin_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Opens a new `Repair` of the `Vehicle` with the provided ID.
    ///
    /// The `Vehicle` is moved into the `IN_REPAIR` status.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `VEHICLE_NOT_EXISTS` - the `Vehicle` does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "createRepair",
            mechanic_id = ?mechanic_id.map(|id| id.to_string()),
            otel.name = Self::SPAN_NAME,
            title = %title,
            vehicle_id = %vehicle_id,
        ),
    )]
    pub async fn create_repair(
        vehicle_id: api::vehicle::Id,
        title: api::repair::Title,
        description: Option<api::repair::Description>,
        mechanic_id: Option<api::user::Id>,
        ctx: &Context,
    ) -> Result<api::Repair, Error> {
        ctx.service()
            .execute(command::CreateRepair {
                vehicle_id: vehicle_id.into(),
                title: title.into(),
                description: description.map(Into::into),
                mechanic_id: mechanic_id.map(Into::into),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Updates the `Repair` with the provided ID.
    ///
    /// Provided `laborCost` recomputes the total cost of the `Repair`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `VALIDATION_FAILED` - provided labor cost is negative, too large or finer
    ///                         than a cent;
    /// - `REPAIR_NOT_EXISTS` - the `Repair` does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "updateRepair",
            otel.name = Self::SPAN_NAME,
            repair_id = %repair_id,
        ),
    )]
    pub async fn update_repair(
        repair_id: api::repair::Id,
        title: api::repair::Title,
        description: Option<api::repair::Description>,
        labor_cost: Option<Money>,
        mechanic_id: Option<api::user::Id>,
        work_notes: Option<api::repair::WorkNotes>,
        ctx: &Context,
    ) -> Result<api::Repair, Error> {
        let labor_cost = labor_cost
            .map(api::amount)
            .transpose()
            .map_err(ctx.error())?;

        ctx.service()
            .execute(command::UpdateRepair {
                repair_id: repair_id.into(),
                title: title.into(),
                description: description.map(Into::into),
                labor_cost,
                mechanic_id: mechanic_id.map(Into::into),
                work_notes: work_notes.map(Into::into),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Moves the `Repair` with the provided ID into the provided status.
    ///
    /// Completing a `Repair` adds its total cost to the `Vehicle` and moves
    /// the `Vehicle` into the `READY_TO_SELL` status. Cancelling a `Repair`
    /// returns nothing to the stock.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_STATUS_TRANSITION` - the current status of the `Repair`
    ///                                 cannot be followed by the provided
    ///                                 one;
    /// - `REPAIR_NOT_EXISTS` - the `Repair` does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "updateRepairStatus",
            otel.name = Self::SPAN_NAME,
            repair_id = %repair_id,
            status = ?status,
        ),
    )]
    pub async fn update_repair_status(
        repair_id: api::repair::Id,
        status: api::repair::Status,
        ctx: &Context,
    ) -> Result<api::Repair, Error> {
        ctx.service()
            .execute(command::UpdateRepairStatus {
                repair_id: repair_id.into(),
                status: status.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Consumes the provided quantity of the `SparePart` with the provided ID
    /// in the `Repair` with the provided ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `VALIDATION_FAILED` - provided quantity is not positive;
    /// - `INSUFFICIENT_STOCK` - the `SparePart` has not enough units in
    ///                          stock;
    /// - `REPAIR_NOT_EXISTS` - the `Repair` does not exist;
    /// - `SPARE_PART_NOT_EXISTS` - the `SparePart` does not exist or is
    ///                             deleted.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "addRepairPart",
            otel.name = Self::SPAN_NAME,
            quantity = %quantity,
            repair_id = %repair_id,
            spare_part_id = %spare_part_id,
        ),
    )]
    pub async fn add_repair_part(
        repair_id: api::repair::Id,
        spare_part_id: api::spare_part::Id,
        quantity: i32,
        notes: Option<api::repair::part::Notes>,
        ctx: &Context,
    ) -> Result<api::repair::part::AddResult, Error> {
        let quantity =
            api::spare_part::quantity(quantity).map_err(ctx.error())?;

        ctx.service()
            .execute(command::AddRepairPart {
                repair_id: repair_id.into(),
                spare_part_id: spare_part_id.into(),
                quantity,
                notes: notes.map(Into::into),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Removes the `RepairPart` with the provided ID from the `Repair` with
    /// the provided ID, returning its units to the stock.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `REPAIR_NOT_EXISTS` - the `Repair` does not exist;
    /// - `REPAIR_PART_NOT_EXISTS` - the `RepairPart` does not exist in the
    ///                              `Repair`;
    /// - `STOCK_OVERFLOW` - the `SparePart` stock cannot count the returned
    ///                      units.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "removeRepairPart",
            otel.name = Self::SPAN_NAME,
            part_id = %part_id,
            repair_id = %repair_id,
        ),
    )]
    pub async fn remove_repair_part(
        repair_id: api::repair::Id,
        part_id: api::repair::part::Id,
        ctx: &Context,
    ) -> Result<api::Repair, Error> {
        ctx.service()
            .execute(command::RemoveRepairPart {
                repair_id: repair_id.into(),
                part_id: part_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Records the showroom buying the `Vehicle` with the provided ID from
    /// the `Customer` with the provided ID.
    ///
    /// The `Vehicle` is moved into the `PURCHASED` status.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `VALIDATION_FAILED` - provided amount is negative, too large or
    ///                         finer than a cent, or `CREDIT` payment method
    ///                         is provided;
    /// - `CUSTOMER_NOT_EXISTS` - the `Customer` does not exist or is
    ///                           deleted;
    /// - `VEHICLE_NOT_EXISTS` - the `Vehicle` does not exist.
    #[expect(clippy::too_many_arguments, reason = "GraphQL input")]
    #[tracing::instrument(
        skip_all,
        fields(
            cashier_id = %cashier_id,
            customer_id = %customer_id,
            gql.name = "createPurchaseTransaction",
            otel.name = Self::SPAN_NAME,
            payment_method = ?payment_method,
            vehicle_id = %vehicle_id,
            vehicle_price = %vehicle_price,
        ),
    )]
    pub async fn create_purchase_transaction(
        vehicle_id: api::vehicle::Id,
        customer_id: api::customer::Id,
        vehicle_price: Money,
        tax_amount: Option<Money>,
        payment_method: api::transaction::PaymentMethod,
        payment_reference: Option<api::transaction::PaymentReference>,
        notes: Option<api::transaction::Notes>,
        cashier_id: api::user::Id,
        ctx: &Context,
    ) -> Result<api::Purchase, Error> {
        let vehicle_price =
            api::amount(vehicle_price).map_err(ctx.error())?;
        let tax_amount = api::amount(tax_amount.unwrap_or_default())
            .map_err(ctx.error())?;
        let payment_method = service::domain::transaction::PaymentMethod::from(
            payment_method,
        );
        if !payment_method.is_allowed_for_purchase() {
            return Err(api::ValidationError::PaymentMethodNotAllowed.into())
                .map_err(ctx.error());
        }

        ctx.service()
            .execute(command::CreatePurchaseTransaction {
                vehicle_id: vehicle_id.into(),
                customer_id: customer_id.into(),
                vehicle_price,
                tax_amount,
                payment_method,
                payment_reference: payment_reference.map(Into::into),
                notes: notes.map(Into::into),
                cashier_id: cashier_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Records the showroom selling the `Vehicle` with the provided ID to the
    /// `Customer` with the provided ID.
    ///
    /// The `Vehicle` is moved into the `SOLD` status.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `VALIDATION_FAILED` - provided amount is negative, too large or finer
    ///                         than a cent;
    /// - `CUSTOMER_NOT_EXISTS` - the `Customer` does not exist or is
    ///                           deleted;
    /// - `VEHICLE_NOT_AVAILABLE` - the `Vehicle` is not `READY_TO_SELL` or
    ///                             `RESERVED`;
    /// - `VEHICLE_NOT_EXISTS` - the `Vehicle` does not exist.
    #[expect(clippy::too_many_arguments, reason = "GraphQL input")]
    #[tracing::instrument(
        skip_all,
        fields(
            cashier_id = %cashier_id,
            customer_id = %customer_id,
            gql.name = "createSalesTransaction",
            otel.name = Self::SPAN_NAME,
            payment_method = ?payment_method,
            vehicle_id = %vehicle_id,
            vehicle_price = %vehicle_price,
        ),
    )]
    pub async fn create_sales_transaction(
        vehicle_id: api::vehicle::Id,
        customer_id: api::customer::Id,
        vehicle_price: Money,
        tax_amount: Option<Money>,
        discount_amount: Option<Money>,
        payment_method: api::transaction::PaymentMethod,
        payment_reference: Option<api::transaction::PaymentReference>,
        notes: Option<api::transaction::Notes>,
        cashier_id: api::user::Id,
        ctx: &Context,
    ) -> Result<api::Sale, Error> {
        let vehicle_price =
            api::amount(vehicle_price).map_err(ctx.error())?;
        let tax_amount = api::amount(tax_amount.unwrap_or_default())
            .map_err(ctx.error())?;
        let discount_amount =
            api::amount(discount_amount.unwrap_or_default())
                .map_err(ctx.error())?;

        ctx.service()
            .execute(command::CreateSalesTransaction {
                vehicle_id: vehicle_id.into(),
                customer_id: customer_id.into(),
                vehicle_price,
                tax_amount,
                discount_amount,
                payment_method: payment_method.into(),
                payment_reference: payment_reference.map(Into::into),
                notes: notes.map(Into::into),
                cashier_id: cashier_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Registers a new `SparePart` in the catalogue.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `VALIDATION_FAILED` - provided price or stock level is negative.
    #[expect(clippy::too_many_arguments, reason = "GraphQL input")]
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "createSparePart",
            name = %name,
            otel.name = Self::SPAN_NAME,
            stock_quantity = ?stock_quantity,
        ),
    )]
    pub async fn create_spare_part(
        name: api::spare_part::Name,
        description: Option<api::spare_part::Description>,
        brand: Option<api::spare_part::Brand>,
        cost_price: Money,
        selling_price: Money,
        stock_quantity: Option<i32>,
        min_stock_level: Option<i32>,
        unit_measure: Option<api::spare_part::UnitMeasure>,
        ctx: &Context,
    ) -> Result<api::SparePart, Error> {
        let cost_price = api::amount(cost_price).map_err(ctx.error())?;
        let selling_price =
            api::amount(selling_price).map_err(ctx.error())?;
        let stock_quantity = api::count(stock_quantity.unwrap_or_default())
            .map_err(ctx.error())?;
        let min_stock_level = api::count(min_stock_level.unwrap_or_default())
            .map_err(ctx.error())?;

        ctx.service()
            .execute(command::CreateSparePart {
                name: name.into(),
                description: description.map(Into::into),
                brand: brand.map(Into::into),
                cost_price,
                selling_price,
                stock_quantity,
                min_stock_level,
                unit_measure: unit_measure.map(Into::into),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Updates the `SparePart` with the provided ID.
    ///
    /// Its stock is changed only via `adjustSparePartStock` or `Repair`s.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `VALIDATION_FAILED` - provided price or stock level is negative;
    /// - `SPARE_PART_NOT_EXISTS` - the `SparePart` does not exist.
    #[expect(clippy::too_many_arguments, reason = "GraphQL input")]
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "updateSparePart",
            otel.name = Self::SPAN_NAME,
            spare_part_id = %spare_part_id,
        ),
    )]
    pub async fn update_spare_part(
        spare_part_id: api::spare_part::Id,
        name: api::spare_part::Name,
        description: Option<api::spare_part::Description>,
        brand: Option<api::spare_part::Brand>,
        cost_price: Money,
        selling_price: Money,
        min_stock_level: i32,
        unit_measure: Option<api::spare_part::UnitMeasure>,
        is_active: Option<bool>,
        ctx: &Context,
    ) -> Result<api::SparePart, Error> {
        let cost_price = api::amount(cost_price).map_err(ctx.error())?;
        let selling_price =
            api::amount(selling_price).map_err(ctx.error())?;
        let min_stock_level =
            api::count(min_stock_level).map_err(ctx.error())?;

        ctx.service()
            .execute(command::UpdateSparePart {
                spare_part_id: spare_part_id.into(),
                name: name.into(),
                description: description.map(Into::into),
                brand: brand.map(Into::into),
                cost_price,
                selling_price,
                min_stock_level,
                unit_measure: unit_measure.map(Into::into),
                is_active,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Sets the stock of the `SparePart` with the provided ID to the provided
    /// absolute quantity, recording an adjustment `StockMovement`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `VALIDATION_FAILED` - provided quantity is negative;
    /// - `SPARE_PART_NOT_EXISTS` - the `SparePart` does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "adjustSparePartStock",
            otel.name = Self::SPAN_NAME,
            quantity = %quantity,
            spare_part_id = %spare_part_id,
        ),
    )]
    pub async fn adjust_spare_part_stock(
        spare_part_id: api::spare_part::Id,
        quantity: i32,
        notes: Option<api::spare_part::MovementNotes>,
        ctx: &Context,
    ) -> Result<api::SparePart, Error> {
        let quantity = api::count(quantity).map_err(ctx.error())?;

        ctx.service()
            .execute(command::AdjustSparePartStock {
                spare_part_id: spare_part_id.into(),
                quantity,
                notes: notes.map(Into::into),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Deletes the `SparePart` with the provided ID from the catalogue.
    ///
    /// The `SparePart` stays referenced by the past `Repair`s.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `SPARE_PART_NOT_EXISTS` - the `SparePart` does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "deleteSparePart",
            otel.name = Self::SPAN_NAME,
            spare_part_id = %spare_part_id,
        ),
    )]
    pub async fn delete_spare_part(
        spare_part_id: api::spare_part::Id,
        ctx: &Context,
    ) -> Result<api::SparePart, Error> {
        ctx.service()
            .execute(command::DeleteSparePart {
                spare_part_id: spare_part_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Registers a new `Customer`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "createCustomer",
            kind = ?kind,
            name = %name,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn create_customer(
        name: api::customer::Name,
        phone: Option<api::customer::Phone>,
        email: Option<api::customer::Email>,
        address: Option<api::customer::Address>,
        id_card_number: Option<api::customer::IdCardNumber>,
        kind: Option<api::customer::Kind>,
        ctx: &Context,
    ) -> Result<api::Customer, Error> {
        ctx.service()
            .execute(command::CreateCustomer {
                name: name.into(),
                phone: phone.map(Into::into),
                email: email.map(Into::into),
                address: address.map(Into::into),
                id_card_number: id_card_number.map(Into::into),
                kind: kind.unwrap_or(api::customer::Kind::Individual).into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Updates the `Customer` with the provided ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `CUSTOMER_NOT_EXISTS` - the `Customer` does not exist or is
    ///                           deleted.
    #[tracing::instrument(
        skip_all,
        fields(
            customer_id = %customer_id,
            gql.name = "updateCustomer",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn update_customer(
        customer_id: api::customer::Id,
        name: api::customer::Name,
        phone: Option<api::customer::Phone>,
        email: Option<api::customer::Email>,
        address: Option<api::customer::Address>,
        id_card_number: Option<api::customer::IdCardNumber>,
        kind: api::customer::Kind,
        ctx: &Context,
    ) -> Result<api::Customer, Error> {
        ctx.service()
            .execute(command::UpdateCustomer {
                customer_id: customer_id.into(),
                name: name.into(),
                phone: phone.map(Into::into),
                email: email.map(Into::into),
                address: address.map(Into::into),
                id_card_number: id_card_number.map(Into::into),
                kind: kind.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Deletes the `Customer` with the provided ID.
    ///
    /// The `Customer` stays referenced by the past `Purchase`s and `Sale`s.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `CUSTOMER_NOT_EXISTS` - the `Customer` does not exist or is
    ///                           deleted already.
    #[tracing::instrument(
        skip_all,
        fields(
            customer_id = %customer_id,
            gql.name = "deleteCustomer",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn delete_customer(
        customer_id: api::customer::Id,
        ctx: &Context,
    ) -> Result<api::Customer, Error> {
        ctx.service()
            .execute(command::DeleteCustomer {
                customer_id: customer_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }
}

/// Appends the provided `details` to the message of the provided [`Error`].
fn detailed(mut err: Error, details: &impl fmt::Display) -> Error {
    err.message = format!("{}: {details}", err.message);
    err
}

impl AsError for command::create_vehicle::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "CHASSIS_NUMBER_OCCUPIED"]
                #[status = CONFLICT]
                #[message = "Provided chassis number is occupied by another \
                             `Vehicle`"]
                ChassisNumberOccupied,
            }
        }

        Some(match self {
            Self::ChassisNumberOccupied(_) => {
                Error::ChassisNumberOccupied.into()
            }
            Self::CustomerNotExists(_) => api::NotExistsError::Customer.into(),
            Self::Db(e) => return e.try_as_error(),
        })
    }
}

impl AsError for command::update_vehicle::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::VehicleNotExists(_) => api::NotExistsError::Vehicle.into(),
        })
    }
}

impl AsError for command::update_vehicle_status::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::VehicleNotExists(_) => api::NotExistsError::Vehicle.into(),
        })
    }
}

impl AsError for command::delete_vehicle::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "VEHICLE_HAS_HISTORY"]
                #[status = CONFLICT]
                #[message = "`Vehicle` is referenced by a `Repair`, \
                             a `Purchase` or a `Sale`"]
                VehicleHasHistory,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::VehicleHasHistory(_) => Error::VehicleHasHistory.into(),
            Self::VehicleNotExists(_) => api::NotExistsError::Vehicle.into(),
        })
    }
}

impl AsError for command::approve_vehicle_price::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "USER_NOT_ADMIN"]
                #[status = FORBIDDEN]
                #[message = "Only an active `User` with the `ADMIN` role can \
                             approve prices"]
                UserNotAdmin,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::UserNotAdmin(_) => Error::UserNotAdmin.into(),
            Self::UserNotExists(_) => api::NotExistsError::User.into(),
            Self::VehicleNotExists(_) => api::NotExistsError::Vehicle.into(),
        })
    }
}

impl AsError for command::create_repair::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::VehicleNotExists(_) => api::NotExistsError::Vehicle.into(),
        })
    }
}

impl AsError for command::update_repair::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::RepairNotExists(_) => api::NotExistsError::Repair.into(),
        })
    }
}

impl AsError for command::update_repair_status::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "INVALID_STATUS_TRANSITION"]
                #[status = CONFLICT]
                #[message = "`Repair` cannot be moved into the provided \
                             status"]
                InvalidStatusTransition,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::InvalidStatusTransition(e) => {
                detailed(Error::InvalidStatusTransition.into(), e)
            }
            Self::RepairNotExists(_) => api::NotExistsError::Repair.into(),
            // The repaired `Vehicle` vanishing is a broken invariant.
            Self::VehicleNotExists(_) => return None,
        })
    }
}

impl AsError for command::add_repair_part::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "INSUFFICIENT_STOCK"]
                #[status = CONFLICT]
                #[message = "`SparePart` has not enough units in stock"]
                InsufficientStock,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::InsufficientStock(e) => {
                detailed(Error::InsufficientStock.into(), e)
            }
            Self::RepairNotExists(_) => api::NotExistsError::Repair.into(),
            Self::SparePartNotExists(_) => {
                api::NotExistsError::SparePart.into()
            }
        })
    }
}

impl AsError for command::remove_repair_part::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "STOCK_OVERFLOW"]
                #[status = CONFLICT]
                #[message = "`SparePart` stock cannot take the units back"]
                StockOverflow,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::RepairNotExists(_) => api::NotExistsError::Repair.into(),
            Self::RepairPartNotExists(_) => {
                api::NotExistsError::RepairPart.into()
            }
            Self::SparePartNotExists(_) => {
                api::NotExistsError::SparePart.into()
            }
            Self::StockOverflow(e) => detailed(Error::StockOverflow.into(), e),
        })
    }
}

impl AsError for command::create_purchase_transaction::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::CustomerNotExists(_) => api::NotExistsError::Customer.into(),
            Self::Db(e) => return e.try_as_error(),
            Self::VehicleNotExists(_) => api::NotExistsError::Vehicle.into(),
        })
    }
}

impl AsError for command::create_sales_transaction::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "VEHICLE_NOT_AVAILABLE"]
                #[status = CONFLICT]
                #[message = "`Vehicle` is not available for sale"]
                VehicleNotAvailable,
            }
        }

        Some(match self {
            Self::CustomerNotExists(_) => api::NotExistsError::Customer.into(),
            Self::Db(e) => return e.try_as_error(),
            Self::VehicleNotAvailable(_, status) => detailed(
                Error::VehicleNotAvailable.into(),
                &format_args!("its status is `{status}`"),
            ),
            Self::VehicleNotExists(_) => api::NotExistsError::Vehicle.into(),
        })
    }
}

impl AsError for command::update_spare_part::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::SparePartNotExists(_) => {
                api::NotExistsError::SparePart.into()
            }
        })
    }
}

impl AsError for command::adjust_spare_part_stock::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::SparePartNotExists(_) => {
                api::NotExistsError::SparePart.into()
            }
        })
    }
}

impl AsError for command::delete_spare_part::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::SparePartNotExists(_) => {
                api::NotExistsError::SparePart.into()
            }
        })
    }
}

impl AsError for command::update_customer::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::CustomerNotExists(_) => api::NotExistsError::Customer.into(),
            Self::Db(e) => return e.try_as_error(),
        })
    }
}

impl AsError for command::delete_customer::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::CustomerNotExists(_) => api::NotExistsError::Customer.into(),
            Self::Db(e) => return e.try_as_error(),
        })
    }
}

#[cfg(test)]
mod spec {
    use http::StatusCode;
    use service::{command, domain};

    use crate::AsError as _;

    #[test]
    fn maps_insufficient_stock_to_conflict() {
        let err = command::add_repair_part::ExecutionError::InsufficientStock(
            domain::spare_part::InsufficientStock {
                available: 3,
                requested: 5,
            },
        )
        .as_error();

        assert_eq!(err.code, "INSUFFICIENT_STOCK");
        assert_eq!(err.status_code, StatusCode::CONFLICT);
        assert!(
            err.message.ends_with("requested 5 units, but only 3 in stock"),
            "wrong message: {}",
            err.message,
        );
    }

    #[test]
    fn maps_unavailable_vehicle_to_conflict() {
        let err =
            command::create_sales_transaction::ExecutionError::VehicleNotAvailable(
                domain::vehicle::Id::new(),
                domain::vehicle::Status::InRepair,
            )
            .as_error();

        assert_eq!(err.code, "VEHICLE_NOT_AVAILABLE");
        assert_eq!(err.status_code, StatusCode::CONFLICT);
        assert!(err.message.contains("IN_REPAIR"), "{}", err.message);
    }

    #[test]
    fn maps_missing_entities_to_not_found() {
        let err = command::remove_repair_part::ExecutionError::RepairPartNotExists(
            domain::repair::part::Id::new(),
        )
        .as_error();

        assert_eq!(err.code, "REPAIR_PART_NOT_EXISTS");
        assert_eq!(err.status_code, StatusCode::NOT_FOUND);
    }

    #[test]
    fn maps_stock_overflow_to_conflict() {
        let err = command::remove_repair_part::ExecutionError::StockOverflow(
            domain::spare_part::StockOverflow {
                available: u32::MAX,
                released: 1,
            },
        )
        .as_error();

        assert_eq!(err.code, "STOCK_OVERFLOW");
        assert_eq!(err.status_code, StatusCode::CONFLICT);
    }
}
