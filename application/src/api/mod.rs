//! GraphQL API definitions.

pub mod customer;
pub mod dashboard;
mod mutation;
mod query;
pub mod repair;
pub mod scalar;
pub mod spare_part;
pub mod transaction;
pub mod user;
pub mod vehicle;

use common::Money;
use juniper::EmptySubscription;

use crate::{define_error, Context, Error};

pub use self::{
    customer::Customer,
    dashboard::DashboardStats,
    mutation::Mutation,
    query::Query,
    repair::Repair,
    spare_part::SparePart,
    transaction::{Purchase, Sale},
    user::User,
    vehicle::Vehicle,
};

/// GraphQL schema.
pub type Schema =
    juniper::RootNode<'static, Query, Mutation, EmptySubscription<Context>>;

define_error! {
    enum ValidationError {
        #[code = "VALIDATION_FAILED"]
        #[status = BAD_REQUEST]
        #[message = "Amount of money cannot be negative"]
        NegativeAmount,

        #[code = "VALIDATION_FAILED"]
        #[status = BAD_REQUEST]
        #[message = "Amount of money cannot exceed 9999999999999.99"]
        AmountTooLarge,

        #[code = "VALIDATION_FAILED"]
        #[status = BAD_REQUEST]
        #[message = "Amount of money cannot have more than 2 decimal places"]
        AmountTooPrecise,

        #[code = "VALIDATION_FAILED"]
        #[status = BAD_REQUEST]
        #[message = "Count cannot be negative"]
        NegativeCount,

        #[code = "VALIDATION_FAILED"]
        #[status = BAD_REQUEST]
        #[message = "Quantity must be positive"]
        NonPositiveQuantity,

        #[code = "VALIDATION_FAILED"]
        #[status = BAD_REQUEST]
        #[message = "Year must be between 1900 and 2100"]
        YearOutOfRange,

        #[code = "VALIDATION_FAILED"]
        #[status = BAD_REQUEST]
        #[message = "Credit is not accepted for purchases"]
        PaymentMethodNotAllowed,
    }
}

define_error! {
    enum NotExistsError {
        #[code = "VEHICLE_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Vehicle` with the specified ID does not exist"]
        Vehicle,

        #[code = "REPAIR_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Repair` with the specified ID does not exist"]
        Repair,

        #[code = "REPAIR_PART_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`RepairPart` with the specified ID does not exist in \
                     the `Repair`"]
        RepairPart,

        #[code = "SPARE_PART_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`SparePart` with the specified ID does not exist"]
        SparePart,

        #[code = "CUSTOMER_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Customer` with the specified ID does not exist"]
        Customer,

        #[code = "USER_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`User` with the specified ID does not exist"]
        User,

        #[code = "PURCHASE_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Purchase` with the specified ID does not exist"]
        Purchase,

        #[code = "SALE_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Sale` with the specified ID does not exist"]
        Sale,
    }
}

/// Ensures the provided [`Money`] amount is storable: between zero and
/// [`Money::MAX`], in whole cents.
///
/// # Errors
///
/// - With [`ValidationError::NegativeAmount`] if it's below zero.
/// - With [`ValidationError::AmountTooLarge`] if it exceeds [`Money::MAX`].
/// - With [`ValidationError::AmountTooPrecise`] if it has fractions of a
///   cent.
pub(crate) fn amount(amount: Money) -> Result<Money, Error> {
    if amount.is_negative() {
        return Err(ValidationError::NegativeAmount.into());
    }
    if !amount.is_within_bounds() {
        return Err(ValidationError::AmountTooLarge.into());
    }
    if !amount.is_in_minor_units() {
        return Err(ValidationError::AmountTooPrecise.into());
    }
    Ok(amount)
}

/// Converts the provided GraphQL count into a [`u32`].
///
/// # Errors
///
/// With [`ValidationError::NegativeCount`] if it's negative.
pub(crate) fn count(n: i32) -> Result<u32, Error> {
    u32::try_from(n).map_err(|_| ValidationError::NegativeCount.into())
}

/// Converts the provided [`u32`] into a GraphQL [`i32`], saturating on
/// overflow.
pub(crate) fn int(n: u32) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod spec {
    use common::Money;

    use super::{amount, count, int};

    fn money(s: &str) -> Money {
        s.parse().unwrap()
    }

    #[test]
    fn validates_amounts_and_counts() {
        assert!(amount(Money::ZERO).is_ok());
        assert!(amount(Money::from(10)).is_ok());
        assert!(amount(money("0.01")).is_ok());
        assert_eq!(amount(Money::MAX).unwrap(), Money::MAX);

        let err = amount(-Money::from(10)).unwrap_err();
        assert_eq!(err.code, "VALIDATION_FAILED");
        assert_eq!(err.status_code, http::StatusCode::BAD_REQUEST);

        assert_eq!(count(5).unwrap(), 5);
        assert!(count(-1).is_err());
        assert_eq!(int(u32::MAX), i32::MAX);
    }

    #[test]
    fn rejects_oversized_amount() {
        let huge = money("79228162514264337593543950335");

        let err = amount(huge).unwrap_err();
        assert_eq!(err.code, "VALIDATION_FAILED");
        assert_eq!(err.status_code, http::StatusCode::BAD_REQUEST);
        assert_eq!(
            err.message,
            "Amount of money cannot exceed 9999999999999.99",
        );

        assert!(amount(money("10000000000000")).is_err());
    }

    #[test]
    fn rejects_fractions_of_cent() {
        let err = amount(money("0.001")).unwrap_err();
        assert_eq!(err.code, "VALIDATION_FAILED");
        assert_eq!(err.status_code, http::StatusCode::BAD_REQUEST);
        assert_eq!(
            err.message,
            "Amount of money cannot have more than 2 decimal places",
        );

        assert!(amount(money("12.500")).is_ok());
    }
}
