use bigdecimal::BigDecimal;

use super::{parse_field, EntityFields, FieldSpec, FormMode, FormState, Rule, Snapshot, ValidationErrors};
use crate::model::{Property, PropertyPayload, PropertyStatus, PropertyType};

pub const ADDRESS: &str = "address";
pub const DESCRIPTION: &str = "description";
pub const PROPERTY_TYPE: &str = "property_type";
pub const STATUS: &str = "status";
pub const AREA: &str = "area";
pub const NUM_OF_ROOMS: &str = "num_of_rooms";

const FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: ADDRESS,
        label: "Address",
        rules: &[Rule::Required],
    },
    FieldSpec {
        name: DESCRIPTION,
        label: "Description",
        rules: &[],
    },
    FieldSpec {
        name: PROPERTY_TYPE,
        label: "Property type",
        rules: &[Rule::Required, Rule::OneOf(&PropertyType::NAMES)],
    },
    FieldSpec {
        name: STATUS,
        label: "Status",
        rules: &[Rule::Required, Rule::OneOf(&PropertyStatus::NAMES)],
    },
    FieldSpec {
        name: AREA,
        label: "Area",
        rules: &[Rule::Required, Rule::NonNegative],
    },
    FieldSpec {
        name: NUM_OF_ROOMS,
        label: "Number of rooms",
        rules: &[Rule::Required, Rule::AtLeast(1)],
    },
];

/// Property form schema
pub struct PropertyFields;

impl EntityFields for PropertyFields {
    type Record = Property;
    type Payload = PropertyPayload;

    fn fields(_mode: FormMode) -> &'static [FieldSpec] {
        FIELDS
    }

    fn payload(state: &FormState, _mode: FormMode) -> Result<PropertyPayload, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let property_type = parse_field::<PropertyType>(state, PROPERTY_TYPE, &mut errors);
        let status = parse_field::<PropertyStatus>(state, STATUS, &mut errors);
        let area = parse_field::<BigDecimal>(state, AREA, &mut errors);
        let num_of_rooms = parse_field::<u32>(state, NUM_OF_ROOMS, &mut errors);

        match (property_type, status, area, num_of_rooms) {
            (Some(property_type), Some(status), Some(area), Some(num_of_rooms)) => {
                Ok(PropertyPayload {
                    address: state.text(ADDRESS).trim().to_string(),
                    description: state.trimmed(DESCRIPTION).map(String::from),
                    property_type,
                    status,
                    area,
                    num_of_rooms,
                })
            }
            _ => Err(errors),
        }
    }

    fn snapshot(property: &Property) -> Snapshot {
        Snapshot::default()
            .text(ADDRESS, &property.address)
            .text(DESCRIPTION, property.description.as_deref().unwrap_or_default())
            .text(PROPERTY_TYPE, property.property_type)
            .text(STATUS, property.status)
            .text(AREA, &property.area)
            .text(NUM_OF_ROOMS, property.num_of_rooms)
    }
}
