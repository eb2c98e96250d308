use crate::domain::naming::snake_case;
use crate::domain::{Construct, FieldKind};

/// One schema entry as exposed to manifest and builder authors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldInfo {
    /// Name accepted by the builder and in manifests.
    pub name: String,
    /// Key written to the plist.
    pub key: &'static str,
    pub kind: FieldKind,
}

/// Fields of one construct, or of all constructs when none is given.
pub fn execute(construct: Option<Construct>) -> Vec<(Construct, Vec<FieldInfo>)> {
    let constructs: Vec<Construct> = match construct {
        Some(c) => vec![c],
        None => Construct::ALL.to_vec(),
    };
    constructs
        .into_iter()
        .map(|c| {
            let fields = c
                .fields()
                .iter()
                .map(|&(key, kind)| FieldInfo { name: snake_case(key), key, kind })
                .collect();
            (c, fields)
        })
        .collect()
}
