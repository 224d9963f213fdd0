//! Closed value sets used by the Econt API.
//!
//! Each enum maps a case name to the string value sent over the wire. The
//! [`EnumKind`] and [`EnumValue`] types let the casting layer work with any
//! of them uniformly.

use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

macro_rules! value_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => ($case:literal, $value:literal) ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            const CASES: &'static [Self] = &[$(Self::$variant),+];

            /// Returns the value sent to and received from the API.
            #[must_use]
            pub const fn value(self) -> &'static str {
                match self {
                    $(Self::$variant => $value),+
                }
            }

            /// Returns the case name.
            #[must_use]
            pub const fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $case),+
                }
            }

            /// Returns every case in declaration order.
            #[must_use]
            pub const fn cases() -> &'static [Self] {
                Self::CASES
            }

            /// Returns the case whose value equals `value`.
            #[must_use]
            pub fn from_value(value: &str) -> Option<Self> {
                Self::CASES.iter().copied().find(|case| case.value() == value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.value())
            }
        }

        impl Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                serializer.serialize_str(self.value())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                Self::from_value(&s).ok_or_else(|| {
                    de::Error::custom(format!(
                        "unknown {} value: {s}",
                        stringify!($name)
                    ))
                })
            }
        }
    };
}

value_enum! {
    /// Days of the week.
    Weekday {
        Monday => ("monday", "monday"),
        Tuesday => ("tuesday", "tuesday"),
        Wednesday => ("wednesday", "wednesday"),
        Thursday => ("thursday", "thursday"),
        Friday => ("friday", "friday"),
        Saturday => ("saturday", "saturday"),
        Sunday => ("sunday", "sunday"),
    }
}

value_enum! {
    /// Kind of working day in an office schedule.
    DayType {
        Workday => ("workday", "workday"),
        Halfday => ("halfday", "halfday"),
        Holiday => ("holiday", "holiday"),
    }
}

value_enum! {
    /// Service an office provides.
    ServiceType {
        FromDoorCourier => ("fromDoorCourier", "from_door_courier"),
        ToDoorCourier => ("toDoorCourier", "to_door_courier"),
        FromOfficeCourier => ("fromOfficeCourier", "from_office_courier"),
        ToOfficeCourier => ("toOfficeCourier", "to_office_courier"),
        FromDoorCargo => ("fromDoorCargo", "from_door_cargo"),
        ToDoorCargo => ("toDoorCargo", "to_door_cargo"),
        FromOfficeCargo => ("fromOfficeCargo", "from_office_cargo"),
        ToOfficeCargo => ("toOfficeCargo", "to_office_cargo"),
        FromDoorPost => ("fromDoorPost", "from_door_post"),
        ToDoorPost => ("toDoorPost", "to_door_post"),
        FromOfficePost => ("fromOfficePost", "from_office_post"),
        ToOfficePost => ("toOfficePost", "to_office_post"),
        Code1 => ("code1", "code1"),
        FromDoorCargoExpres => ("fromDoorCargoExpres", "from_door_cargo_expres"),
        ToDoorCargoExpres => ("toDoorCargoExpres", "to_door_cargo_expres"),
        FromOfficeCargoExpres => ("fromOfficeCargoExpres", "from_office_cargo_expres"),
        ToOfficeCargoExpres => ("toOfficeCargoExpres", "to_office_cargo_expres"),
        ToDoorTransPallet => ("toDoorTransPallet", "to_door_trans_pallet"),
        ToOfficeTransPallet => ("toOfficeTransPallet", "to_office_trans_pallet"),
    }
}

value_enum! {
    /// Shipment type.
    ShipmentType {
        Document => ("document", "document"),
        Pack => ("pack", "pack"),
        PostPack => ("postPack", "post_pack"),
        Pallet => ("pallet", "pallet"),
        Cargo => ("cargo", "cargo"),
        DocumentPallet => ("documentPallet", "documentpallet"),
        BigLetter => ("bigLetter", "big_letter"),
        SmallLetter => ("smallLetter", "small_letter"),
        MoneyTransfer => ("moneyTransfer", "money_transfer"),
        /// Postal money transfer.
        PostTransfer => ("postTransfer", "pp"),
    }
}

value_enum! {
    /// Side of a shipment a client is on.
    ShipmentSide {
        Sender => ("sender", "sender"),
        Receiver => ("receiver", "receiver"),
        All => ("all", "all"),
    }
}

value_enum! {
    /// Processing state of a courier request.
    RequestCourierStatusType {
        Unprocessed => ("unprocessed", "unprocess"),
        Processed => ("processed", "process"),
        Taken => ("taken", "taken"),
        Rejected => ("rejected", "reject"),
        RejectedClient => ("rejectedClient", "reject_client"),
    }
}

value_enum! {
    /// Kind of shipment instruction.
    InstructionType {
        Take => ("take", "take"),
        Give => ("give", "give"),
        Return => ("return", "return"),
        Services => ("services", "services"),
    }
}

value_enum! {
    /// Where a returned parcel goes.
    ParcelDestination {
        /// The parcel is not returned. Sent as an empty string.
        NoReturn => ("noReturn", ""),
        Sender => ("sender", "sender"),
        Office => ("office", "office"),
        Address => ("address", "address"),
    }
}

value_enum! {
    /// Action taken when the receiver rejects a shipment.
    RejectAction {
        Contact => ("contact", "contact"),
        Instruction => ("instruction", "instruction"),
        ReturnToSender => ("returnToSender", "return_to_sender"),
        ReturnToOffice => ("returnToOffice", "return_to_office"),
        ReturnToAddress => ("returnToAddress", "return_to_address"),
    }
}

/// Identifies one of the enum types, for use in cast descriptors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EnumKind {
    /// [`Weekday`]
    Weekday,
    /// [`DayType`]
    DayType,
    /// [`ServiceType`]
    ServiceType,
    /// [`ShipmentType`]
    ShipmentType,
    /// [`ShipmentSide`]
    ShipmentSide,
    /// [`RequestCourierStatusType`]
    RequestCourierStatusType,
    /// [`InstructionType`]
    InstructionType,
    /// [`ParcelDestination`]
    ParcelDestination,
    /// [`RejectAction`]
    RejectAction,
}

impl EnumKind {
    const ALL: [Self; 9] = [
        Self::Weekday,
        Self::DayType,
        Self::ServiceType,
        Self::ShipmentType,
        Self::ShipmentSide,
        Self::RequestCourierStatusType,
        Self::InstructionType,
        Self::ParcelDestination,
        Self::RejectAction,
    ];

    /// Returns the type name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Weekday => "Weekday",
            Self::DayType => "DayType",
            Self::ServiceType => "ServiceType",
            Self::ShipmentType => "ShipmentType",
            Self::ShipmentSide => "ShipmentSide",
            Self::RequestCourierStatusType => "RequestCourierStatusType",
            Self::InstructionType => "InstructionType",
            Self::ParcelDestination => "ParcelDestination",
            Self::RejectAction => "RejectAction",
        }
    }

    /// Looks up a kind by type name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Returns the case of this enum whose value equals `value`.
    #[must_use]
    pub fn parse(self, value: &str) -> Option<EnumValue> {
        match self {
            Self::Weekday => Weekday::from_value(value).map(EnumValue::Weekday),
            Self::DayType => DayType::from_value(value).map(EnumValue::DayType),
            Self::ServiceType => ServiceType::from_value(value).map(EnumValue::ServiceType),
            Self::ShipmentType => ShipmentType::from_value(value).map(EnumValue::ShipmentType),
            Self::ShipmentSide => ShipmentSide::from_value(value).map(EnumValue::ShipmentSide),
            Self::RequestCourierStatusType => RequestCourierStatusType::from_value(value)
                .map(EnumValue::RequestCourierStatusType),
            Self::InstructionType => {
                InstructionType::from_value(value).map(EnumValue::InstructionType)
            }
            Self::ParcelDestination => {
                ParcelDestination::from_value(value).map(EnumValue::ParcelDestination)
            }
            Self::RejectAction => RejectAction::from_value(value).map(EnumValue::RejectAction),
        }
    }
}

/// A case of any of the enum types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EnumValue {
    /// A [`Weekday`] case.
    Weekday(Weekday),
    /// A [`DayType`] case.
    DayType(DayType),
    /// A [`ServiceType`] case.
    ServiceType(ServiceType),
    /// A [`ShipmentType`] case.
    ShipmentType(ShipmentType),
    /// A [`ShipmentSide`] case.
    ShipmentSide(ShipmentSide),
    /// A [`RequestCourierStatusType`] case.
    RequestCourierStatusType(RequestCourierStatusType),
    /// An [`InstructionType`] case.
    InstructionType(InstructionType),
    /// A [`ParcelDestination`] case.
    ParcelDestination(ParcelDestination),
    /// A [`RejectAction`] case.
    RejectAction(RejectAction),
}

impl EnumValue {
    /// Returns the wire value.
    #[must_use]
    pub const fn value(self) -> &'static str {
        match self {
            Self::Weekday(v) => v.value(),
            Self::DayType(v) => v.value(),
            Self::ServiceType(v) => v.value(),
            Self::ShipmentType(v) => v.value(),
            Self::ShipmentSide(v) => v.value(),
            Self::RequestCourierStatusType(v) => v.value(),
            Self::InstructionType(v) => v.value(),
            Self::ParcelDestination(v) => v.value(),
            Self::RejectAction(v) => v.value(),
        }
    }

    /// Returns the case name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Weekday(v) => v.name(),
            Self::DayType(v) => v.name(),
            Self::ServiceType(v) => v.name(),
            Self::ShipmentType(v) => v.name(),
            Self::ShipmentSide(v) => v.name(),
            Self::RequestCourierStatusType(v) => v.name(),
            Self::InstructionType(v) => v.name(),
            Self::ParcelDestination(v) => v.name(),
            Self::RejectAction(v) => v.name(),
        }
    }

    /// Returns the enum type of this case.
    #[must_use]
    pub const fn kind(self) -> EnumKind {
        match self {
            Self::Weekday(_) => EnumKind::Weekday,
            Self::DayType(_) => EnumKind::DayType,
            Self::ServiceType(_) => EnumKind::ServiceType,
            Self::ShipmentType(_) => EnumKind::ShipmentType,
            Self::ShipmentSide(_) => EnumKind::ShipmentSide,
            Self::RequestCourierStatusType(_) => EnumKind::RequestCourierStatusType,
            Self::InstructionType(_) => EnumKind::InstructionType,
            Self::ParcelDestination(_) => EnumKind::ParcelDestination,
            Self::RejectAction(_) => EnumKind::RejectAction,
        }
    }
}

impl fmt::Display for EnumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value())
    }
}

impl Serialize for EnumValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.value())
    }
}
