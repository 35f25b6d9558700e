//! Financial transaction definitions.

pub mod purchase;
pub mod sale;

use common::{define_kind, define_text};

pub use self::{purchase::Purchase, sale::Sale};

define_kind! {
    #[doc = "Status of a [`Purchase`] or a [`Sale`]."]
    enum Status {
        #[doc = "Recorded and in effect."]
        Completed = 1,

        #[doc = "Voided."]
        Cancelled = 2,
    }
}

define_kind! {
    #[doc = "Method a [`Purchase`] or a [`Sale`] is paid with."]
    enum PaymentMethod {
        #[doc = "Cash."]
        Cash = 1,

        #[doc = "Bank transfer."]
        Transfer = 2,

        #[doc = "Check."]
        Check = 3,

        #[doc = "Credit, for [`Sale`]s only."]
        Credit = 4,
    }
}

impl PaymentMethod {
    /// Indicates whether a [`Purchase`] may be paid with this
    /// [`PaymentMethod`].
    #[must_use]
    pub const fn is_allowed_for_purchase(self) -> bool {
        matches!(self, Self::Cash | Self::Transfer | Self::Check)
    }
}

define_text! {
    #[doc = "Reference of a payment (transfer or check number)."]
    struct PaymentReference(max_len = 100);
}

define_text! {
    #[doc = "Free-form notes about a [`Purchase`] or a [`Sale`]."]
    struct Notes(max_len = 4096);
}

/// Marker of an invoice number.
#[derive(Clone, Copy, Debug)]
pub struct Invoice;

#[cfg(test)]
mod spec {
    use super::PaymentMethod;

    #[test]
    fn credit_is_for_sales_only() {
        assert!(PaymentMethod::Cash.is_allowed_for_purchase());
        assert!(PaymentMethod::Transfer.is_allowed_for_purchase());
        assert!(PaymentMethod::Check.is_allowed_for_purchase());
        assert!(!PaymentMethod::Credit.is_allowed_for_purchase());
    }
}
