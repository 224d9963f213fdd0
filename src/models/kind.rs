//! Model kinds and their cast, alias and required-attribute tables.

use std::fmt;

use crate::models::cast::Cast;
use crate::models::enums::EnumKind;

/// The attributes a [`ModelKind::ThreeWayParameters`] model must carry.
const THREE_WAY_REQUIRED: &[&str] = &[
    "requester_name",
    "requester_phone",
    "requester_email",
    "requester_company_name",
    "requester_username",
    "supplier_company_name",
    "supplier_contact_person",
    "supplier_phone",
    "supplier_city",
    "supplier_address",
    "supplier_date_for_visit",
    "supplier_time_for_visit",
    "receiver_name",
    "receiver_company_name",
    "receiver_phone",
    "receiver_email",
    "description_shipment_description",
    "description_shipment_count",
    "description_shipment_weight",
    "description_additional_instructions",
    "description_payment_sum_to_supplier",
    "delivery_details_city",
    "delivery_details_address",
    "delivery_details_office",
    "dc",
    "dccp",
    "email_on_delivery",
    "invoice_before_pay",
    "preview",
    "test",
    "payment_delivery_and_return_by_me",
    "payment_return_by_me",
    "payment_delivery_by_requester",
    "payment_delivery_by_receiver",
    "oc_sum",
    "cd_sum",
    "priority_delivery_time_before",
    "priority_delivery_time_after",
    "priority_delivery_time_in",
];

/// The type of a [`Model`](crate::models::Model).
///
/// Each kind declares which attributes are cast and how, which public names
/// are aliases of stored attributes, and which attributes are required.
/// [`ModelKind::Generic`] declares nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ModelKind {
    /// A street or quarter address.
    Address,
    /// Cash on delivery payment options.
    CdPayOptions,
    /// A city.
    City,
    /// A sender or receiver.
    ClientProfile,
    /// A country.
    Country,
    /// State of a courier request.
    CourierRequestStatus,
    /// An API error, possibly with inner errors.
    Error,
    /// Geo coordinates.
    GeoLocation,
    /// A file hosted by Econt.
    HostedFile,
    /// A shipment instruction.
    Instruction,
    /// A shipment label.
    Label,
    /// Services attached to a label.
    LabelServices,
    /// An Econt office.
    Office,
    /// A service provided by an office.
    OfficeService,
    /// A row of a payment report.
    PaymentReport,
    /// A client profile with addresses and templates.
    Profile,
    /// A city quarter.
    Quarter,
    /// Return instructions.
    ReturnInstruction,
    /// Service times for an address.
    ServiceTimes,
    /// State of a shipment.
    ShipmentStatus,
    /// A street.
    Street,
    /// Parameters of a three way logistics request.
    ThreeWayParameters,
    /// Working hours on a given date.
    WorkingDateTime,
    /// Working hours.
    WorkingTime,
    /// A model without declared casts.
    Generic,
}

impl ModelKind {
    const ALL: [Self; 25] = [
        Self::Address,
        Self::CdPayOptions,
        Self::City,
        Self::ClientProfile,
        Self::Country,
        Self::CourierRequestStatus,
        Self::Error,
        Self::GeoLocation,
        Self::HostedFile,
        Self::Instruction,
        Self::Label,
        Self::LabelServices,
        Self::Office,
        Self::OfficeService,
        Self::PaymentReport,
        Self::Profile,
        Self::Quarter,
        Self::ReturnInstruction,
        Self::ServiceTimes,
        Self::ShipmentStatus,
        Self::Street,
        Self::ThreeWayParameters,
        Self::WorkingDateTime,
        Self::WorkingTime,
        Self::Generic,
    ];

    /// Returns the type name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Address => "Address",
            Self::CdPayOptions => "CdPayOptions",
            Self::City => "City",
            Self::ClientProfile => "ClientProfile",
            Self::Country => "Country",
            Self::CourierRequestStatus => "CourierRequestStatus",
            Self::Error => "Error",
            Self::GeoLocation => "GeoLocation",
            Self::HostedFile => "HostedFile",
            Self::Instruction => "Instruction",
            Self::Label => "Label",
            Self::LabelServices => "LabelServices",
            Self::Office => "Office",
            Self::OfficeService => "OfficeService",
            Self::PaymentReport => "PaymentReport",
            Self::Profile => "Profile",
            Self::Quarter => "Quarter",
            Self::ReturnInstruction => "ReturnInstruction",
            Self::ServiceTimes => "ServiceTimes",
            Self::ShipmentStatus => "ShipmentStatus",
            Self::Street => "Street",
            Self::ThreeWayParameters => "ThreeWayParameters",
            Self::WorkingDateTime => "WorkingDateTime",
            Self::WorkingTime => "WorkingTime",
            Self::Generic => "Model",
        }
    }

    /// Looks up a kind by type name.
    ///
    /// `CDPayOptions` is accepted for [`ModelKind::CdPayOptions`] and
    /// `Model` for [`ModelKind::Generic`].
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        if name == "CDPayOptions" {
            return Some(Self::CdPayOptions);
        }
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Returns the declared cast of `attribute`, which must already be
    /// resolved from any alias.
    #[must_use]
    pub fn cast_for(self, attribute: &str) -> Option<Cast> {
        use Cast::{Collection, Enum, Float, Int, Model};

        let cast = match (self, attribute) {
            (Self::Address, "city") => Model(Self::City),
            (Self::Address | Self::City, "location") => Model(Self::GeoLocation),

            (Self::CdPayOptions, "client") => Model(Self::ClientProfile),
            (Self::CdPayOptions, "address") => Model(Self::Address),
            (Self::CdPayOptions, "payWeekdays") => Cast::array_of(Enum(Some(EnumKind::Weekday))),

            (Self::City, "country") => Model(Self::Country),
            (Self::City, "servingOffices") => Collection(Self::OfficeService),

            (Self::CourierRequestStatus, "status") => {
                Enum(Some(EnumKind::RequestCourierStatusType))
            }
            (Self::CourierRequestStatus | Self::ShipmentStatus, "error") => Model(Self::Error),

            (Self::Error, "innerErrors") => Cast::array_of(Model(Self::Error)),

            (Self::GeoLocation, "latitude" | "longitude") => Float,
            (Self::GeoLocation, "confidence") => Int,

            (Self::Instruction, "type") => Enum(Some(EnumKind::InstructionType)),
            (Self::Instruction, "attachments") => Cast::array_of(Model(Self::HostedFile)),
            (Self::Instruction, "voiceDescription") => Model(Self::HostedFile),
            (Self::Instruction, "returnInstructionParams") => Model(Self::ReturnInstruction),

            (
                Self::Label,
                "senderClient" | "senderAgent" | "receiverClient" | "receiverAgent",
            ) => Model(Self::ClientProfile),
            (Self::Label, "packs") => Collection(Self::Generic),
            (Self::Label, "shipmentType") => Enum(Some(EnumKind::ShipmentType)),
            (Self::Label, "services") => Model(Self::LabelServices),
            (Self::Label, "instructions") => Collection(Self::Instruction),
            (Self::Label, "packingList" | "customsList") => Model(Self::Generic),

            (Self::LabelServices, "cdPayOptions") => Model(Self::CdPayOptions),

            (Self::Office, "address") => Model(Self::Address),
            (Self::Office, "shipmentTypes") => {
                Cast::array_of(Enum(Some(EnumKind::ShipmentType)))
            }

            (Self::OfficeService, "servingType") => Enum(Some(EnumKind::ServiceType)),

            (Self::Profile, "client") => Model(Self::ClientProfile),
            (Self::Profile, "addresses") => Collection(Self::Address),
            (Self::Profile, "cdPayOptions") => Collection(Self::CdPayOptions),
            (Self::Profile, "instructionTemplates") => Collection(Self::Instruction),

            (Self::ReturnInstruction, "returnParcelDestination") => {
                Enum(Some(EnumKind::ParcelDestination))
            }
            (Self::ReturnInstruction, "rejectAction") => Enum(Some(EnumKind::RejectAction)),
            (
                Self::ReturnInstruction,
                "returnParcelReceiverClient"
                | "returnParcelReceiverAgent"
                | "rejectReturnClient"
                | "rejectReturnAgent",
            ) => Model(Self::ClientProfile),
            (
                Self::ReturnInstruction,
                "returnParcelReceiverAddress" | "rejectReturnAddress",
            ) => Model(Self::Address),

            (Self::ServiceTimes, "serviceOffice") => Model(Self::Office),
            (Self::ServiceTimes, "serviceOfficeLatitude" | "serviceOfficeLongitude") => Float,
            (
                Self::ServiceTimes,
                "serviceOfficeClientsWorkTimes" | "serviceOfficeCourierWorkTimes",
            ) => Collection(Self::WorkingTime),
            (Self::ServiceTimes, "serviceOfficeTime") => Model(Self::WorkingDateTime),
            (Self::ServiceTimes, "serviceOfficeNext30daysWorkTime") => {
                Collection(Self::WorkingDateTime)
            }

            (Self::WorkingDateTime, "dayType") => Enum(Some(EnumKind::DayType)),

            _ => return None,
        };

        Some(cast)
    }

    /// Resolves a public attribute name to the stored attribute name.
    #[must_use]
    pub fn resolve_alias<'a>(self, name: &'a str) -> &'a str {
        match (self, name) {
            (Self::Address | Self::City | Self::Country, "neighborhood") => "quarter",
            (Self::CourierRequestStatus, "rejectReason") => "reject_reason",
            (Self::HostedFile, "url") => "URL",
            (Self::Label, "sender") => "senderClient",
            (Self::Label, "receiver") => "receiverClient",
            (Self::ServiceTimes, "office") => "serviceOffice",
            (Self::ServiceTimes, "latitude") => "serviceOfficeLatitude",
            (Self::ServiceTimes, "longitude") => "serviceOfficeLongitude",
            (Self::ServiceTimes, "clientsWorkTimes") => "serviceOfficeClientsWorkTimes",
            (Self::ServiceTimes, "courierWorkTimes") => "serviceOfficeCourierWorkTimes",
            (Self::ServiceTimes, "time") => "serviceOfficeTime",
            (Self::ServiceTimes, "next30daysWorkTime") => "serviceOfficeNext30daysWorkTime",
            _ => name,
        }
    }

    /// Returns the attributes [`Model::validate`](crate::models::Model::validate)
    /// requires, in declaration order.
    #[must_use]
    pub const fn required(self) -> &'static [&'static str] {
        match self {
            Self::ThreeWayParameters => THREE_WAY_REQUIRED,
            _ => &[],
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name() {
        assert_eq!(ModelKind::from_name("City"), Some(ModelKind::City));
        assert_eq!(ModelKind::from_name("CDPayOptions"), Some(ModelKind::CdPayOptions));
        assert_eq!(ModelKind::from_name("Model"), Some(ModelKind::Generic));
        assert_eq!(ModelKind::from_name("Pack"), None);
    }

    #[test]
    fn test_every_kind_round_trips_through_name() {
        for kind in ModelKind::ALL {
            assert_eq!(ModelKind::from_name(kind.name()), Some(kind));
        }
    }

    #[test]
    fn test_alias_resolution() {
        assert_eq!(ModelKind::Address.resolve_alias("neighborhood"), "quarter");
        assert_eq!(ModelKind::ServiceTimes.resolve_alias("office"), "serviceOffice");
        assert_eq!(ModelKind::Label.resolve_alias("sender"), "senderClient");
        assert_eq!(ModelKind::Street.resolve_alias("neighborhood"), "neighborhood");
    }

    #[test]
    fn test_cast_tables() {
        assert_eq!(
            ModelKind::Address.cast_for("city"),
            Some(Cast::Model(ModelKind::City))
        );
        assert_eq!(
            ModelKind::Office.cast_for("shipmentTypes"),
            Some(Cast::array_of(Cast::Enum(Some(EnumKind::ShipmentType))))
        );
        assert_eq!(
            ModelKind::ShipmentStatus.cast_for("error"),
            Some(Cast::Model(ModelKind::Error))
        );
        assert_eq!(ModelKind::Generic.cast_for("city"), None);
        assert_eq!(ModelKind::Address.cast_for("street"), None);
    }

    #[test]
    fn test_required_attributes() {
        let required = ModelKind::ThreeWayParameters.required();
        assert_eq!(required.len(), 39);
        assert_eq!(required[0], "requester_name");
        assert_eq!(required[38], "priority_delivery_time_in");
        assert!(ModelKind::Address.required().is_empty());
    }
}
