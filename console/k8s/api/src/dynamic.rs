use crate::{core, ApiResource, DynamicObject, Resource, Time};
use chrono::{DateTime, Utc};

/// An untyped Kubernetes object viewed as a selection cell.
#[derive(Clone, Debug)]
pub struct DynamicCell(DynamicObject);

/// Converts snapshots of one dynamically discovered resource kind.
///
/// Objects listed from the API server usually carry no type information;
/// those are assumed to be of the bound kind. An object whose `apiVersion`
/// or `kind` names a different resource is rejected when converted back.
#[derive(Clone, Debug)]
pub struct DynamicCells {
    resource: ApiResource,
}

// === impl DynamicCell ===

impl DynamicCell {
    pub fn get_ref(&self) -> &DynamicObject {
        &self.0
    }

    pub fn into_inner(self) -> DynamicObject {
        self.0
    }
}

impl core::Cell for DynamicCell {
    fn name(&self) -> &str {
        self.0.metadata.name.as_deref().unwrap_or_default()
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.0.metadata.creation_timestamp.as_ref().map(|Time(ts)| *ts)
    }
}

// === impl DynamicCells ===

impl DynamicCells {
    pub fn new(resource: ApiResource) -> Self {
        Self { resource }
    }

    /// Binds the adapter to a statically known resource kind.
    pub fn of<K>() -> Self
    where
        K: Resource<DynamicType = ()>,
    {
        Self::new(ApiResource::erase::<K>(&()))
    }

    pub fn resource(&self) -> &ApiResource {
        &self.resource
    }

    fn expected(&self) -> String {
        format!("{}/{}", self.resource.api_version, self.resource.kind)
    }
}

impl core::Adapter for DynamicCells {
    type Resource = DynamicObject;
    type Cell = DynamicCell;

    #[inline]
    fn to_cell(&self, obj: DynamicObject) -> DynamicCell {
        DynamicCell(obj)
    }

    fn from_cell(
        &self,
        DynamicCell(obj): DynamicCell,
    ) -> Result<DynamicObject, core::ConversionError> {
        match obj.types.as_ref() {
            Some(types)
                if types.api_version != self.resource.api_version
                    || types.kind != self.resource.kind =>
            {
                Err(core::ConversionError {
                    expected: self.expected(),
                    found: format!("{}/{}", types.api_version, types.kind),
                    name: obj.metadata.name.clone().unwrap_or_default(),
                })
            }
            _ => Ok(obj),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::{Adapter, ByName, Cell, ConversionError, PaginateQuery, SelectQuery, Selector},
        Namespace, ObjectMeta, Pod, TypeMeta,
    };
    use pretty_assertions::assert_eq;

    fn to_json(objs: &[DynamicObject]) -> Vec<serde_json::Value> {
        objs.iter()
            .map(|o| serde_json::to_value(o).expect("objects must serialize"))
            .collect()
    }

    fn mk_obj(types: Option<(&str, &str)>, name: &str, created: Option<i64>) -> DynamicObject {
        DynamicObject {
            types: types.map(|(api_version, kind)| TypeMeta {
                api_version: api_version.to_string(),
                kind: kind.to_string(),
            }),
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                creation_timestamp: created.map(|secs| {
                    Time(DateTime::from_timestamp(secs, 0).expect("timestamp must be in range"))
                }),
                ..Default::default()
            },
            data: serde_json::json!({ "spec": { "finalizers": ["kubernetes"] } }),
        }
    }

    #[test]
    fn round_trip_of_matching_and_untyped_objects() {
        let adapter = DynamicCells::of::<Namespace>();
        assert_eq!(adapter.resource().kind, "Namespace");

        let objs = vec![
            mk_obj(Some(("v1", "Namespace")), "default", Some(2)),
            mk_obj(None, "kube-system", Some(1)),
        ];
        let cells = adapter.to_cells(objs.clone());
        assert_eq!(
            cells.iter().map(Cell::name).collect::<Vec<_>>(),
            vec!["default", "kube-system"]
        );
        let back = adapter.from_cells(cells).expect("namespaces must convert");
        assert_eq!(to_json(&back), to_json(&objs));
    }

    #[test]
    fn rejects_cells_of_another_kind() {
        let adapter = DynamicCells::of::<Namespace>();
        let cells = adapter.to_cells(vec![
            mk_obj(Some(("v1", "Namespace")), "default", None),
            mk_obj(Some(("v1", "Pod")), "web-0", None),
        ]);

        assert_eq!(
            adapter.from_cells(cells).expect_err("pods must not convert"),
            ConversionError {
                expected: "v1/Namespace".to_string(),
                found: "v1/Pod".to_string(),
                name: "web-0".to_string(),
            }
        );
    }

    #[test]
    fn rejects_other_api_versions() {
        let adapter = DynamicCells::of::<Pod>();
        let error = adapter
            .from_cell(DynamicCell(mk_obj(Some(("v2", "Pod")), "web-0", None)))
            .expect_err("v2 pods must not convert");
        assert_eq!(error.found, "v2/Pod");
        assert_eq!(error.expected, "v1/Pod");
    }

    #[test]
    fn selects_dynamic_objects() {
        let adapter = DynamicCells::of::<Namespace>();
        let cells = adapter.to_cells(vec![
            mk_obj(None, "c", Some(1)),
            mk_obj(None, "a", None),
            mk_obj(None, "b", Some(3)),
        ]);

        let selection = Selector::new(
            cells,
            SelectQuery {
                paginate: PaginateQuery::new(2, 1),
                ..Default::default()
            },
        )
        .with_order(ByName)
        .select();
        assert_eq!(selection.total, 3);

        let items = adapter.from_cells(selection.items).expect("namespaces must convert");
        assert_eq!(
            items
                .iter()
                .map(|o| o.metadata.name.as_deref().unwrap_or_default())
                .collect::<Vec<_>>(),
            vec!["a", "b"]
        );
    }
}
