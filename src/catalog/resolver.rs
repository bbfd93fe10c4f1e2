use crate::bondlayer::model::{Event, RelatedEntity};
use std::collections::BTreeMap;
use tracing::debug;

/// The foreign-key-like fields an event may carry into `related`.
#[derive(strum::IntoStaticStr, Debug, Clone, Copy)]
pub enum RefField {
    #[strum(serialize = "ref_local")]
    Local,
    #[strum(serialize = "ref_seccao")]
    Seccao,
}

/// Looks up the related record an event points at. An unset field or a
/// dangling key is a normal condition (the record may have been filtered out
/// upstream) and resolves to `None`.
pub fn resolve<'a>(
    event: &Event,
    related: &'a BTreeMap<String, RelatedEntity>,
    field: RefField,
) -> Option<&'a RelatedEntity> {
    let key = match field {
        RefField::Local => event.ref_local.as_deref(),
        RefField::Seccao => event.ref_seccao.as_deref(),
    }?;

    let entity = related.get(key);

    if entity.is_none() {
        let field_name: &'static str = field.into();
        debug!(
            "Dangling {} reference '{}' on event {} (omitting)",
            field_name, key, event.id
        );
    }

    entity
}
