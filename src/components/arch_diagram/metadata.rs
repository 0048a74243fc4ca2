use std::collections::HashMap;

use super::types::{ComponentMetadata, NodeId};

/// Lookup from node id to the metadata shown in tooltips and the detail panel.
#[derive(Clone, Debug, Default)]
pub struct MetadataTable {
	entries: HashMap<NodeId, ComponentMetadata>,
}

impl MetadataTable {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn insert(&mut self, id: impl Into<NodeId>, metadata: ComponentMetadata) {
		self.entries.insert(id.into(), metadata);
	}

	/// Entry for `id`, if the table has one.
	pub fn get(&self, id: &NodeId) -> Option<&ComponentMetadata> {
		self.entries.get(id)
	}

	/// Entry for `id`, or the synthesized fallback record.
	pub fn lookup(&self, id: &NodeId) -> ComponentMetadata {
		self.get(id)
			.cloned()
			.unwrap_or_else(|| ComponentMetadata::fallback(id))
	}

	/// Metadata for the components of the built-in architecture diagram.
	pub fn platform() -> Self {
		let mut table = Self::new();
		for &(id, title, category, description, metrics) in PLATFORM {
			table.insert(
				id,
				ComponentMetadata {
					title: title.into(),
					category: category.into(),
					description: description.into(),
					metrics: metrics
						.iter()
						.map(|&(k, v)| (k.to_string(), v.to_string()))
						.collect(),
				},
			);
		}
		table
	}
}

type Row = (
	&'static str,
	&'static str,
	&'static str,
	&'static str,
	&'static [(&'static str, &'static str)],
);

const PLATFORM: &[Row] = &[
	("WebUsers", "Web Users", "UI", "Desktop browser users.", &[("Typical Session", "10–15m")]),
	("MobileUsers", "Mobile Users", "UI", "iOS/Android app users.", &[("Session", "6–8m")]),
	("AdminUsers", "Admin/Agents", "UI", "Agent dashboard.", &[("Users", "~500")]),
	("LB", "API Gateway", "Infra", "LB + WAF + rate limiting.", &[("TLS", "1.3")]),
	("API1", "API Server", "App", "Node/Express business logic.", &[("p95", "<100ms")]),
	("API2", "API Server", "App", "Same as API1.", &[]),
	("API3", "API Server", "App", "Same as API1.", &[]),
	("Postgres", "AWS RDS PostgreSQL", "DB", "Primary (Multi-AZ).", &[("Write p95", "<50ms")]),
	("WAL", "WAL (logical)", "CDC", "Logical decoding source.", &[]),
	("Debezium", "Debezium (pgoutput)", "CDC", "Streams changes to Kafka.", &[("Lag", "<2s")]),
	("Kafka", "Kafka", "MQ", "Buffer + replay.", &[("Retention", "7d")]),
	("MLEnrich", "ML Enrichment", "ML", "Embeddings + 3rd-party enrich.", &[]),
	("Coord1", "Coord Node", "OpenSearch", "Routes + merges.", &[]),
	("Coord2", "Coord Node", "OpenSearch", "Routes + merges.", &[]),
	("Data1", "Data Node", "OpenSearch", "Executes queries, stores shards.", &[]),
	("Data2", "Data Node", "OpenSearch", "Same as Data1.", &[]),
	("Data3", "Data Node", "OpenSearch", "Same as Data1.", &[]),
	("Data4", "Data Node", "OpenSearch", "Same as Data1.", &[]),
	("Indexes", "OpenSearch Indexes", "Storage", "Properties, users, history.", &[]),
	("VectorSearch", "k-NN Vector Search", "Search", "HNSW ANN for recs.", &[("p95", "120–200ms")]),
	("FullText", "BM25 Search", "Search", "Keyword relevance.", &[("p95", "50–200ms")]),
	("Aggregations", "Aggregations/Facets", "Search", "Real-time counts.", &[]),
	("Prometheus", "Prometheus", "Monitoring", "Metrics + alerts.", &[]),
	("Grafana", "Grafana", "Monitoring", "Dashboards.", &[]),
	("S3", "S3 Backups/Exports", "Backup", "RDS snapshots & exports.", &[]),
];

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn platform_table_has_every_documented_component() {
		let table = MetadataTable::platform();
		assert_eq!(PLATFORM.len(), 25);
		for &(id, ..) in PLATFORM {
			assert!(table.get(&NodeId::from(id)).is_some(), "{id} missing");
		}
		let pg = table.get(&NodeId::from("Postgres")).unwrap();
		assert_eq!(pg.title, "AWS RDS PostgreSQL");
		assert_eq!(pg.category, "DB");
		assert_eq!(pg.metrics, vec![("Write p95".to_string(), "<50ms".to_string())]);
	}

	#[test]
	fn missing_entry_falls_back_to_minimal_record() {
		let table = MetadataTable::platform();
		let md = table.lookup(&NodeId::from("PGConstraint"));
		assert_eq!(md.title, "PGConstraint");
		assert_eq!(md.category, "Component");
		assert!(md.description.is_empty());
		assert!(md.metrics.is_empty());
	}

	#[test]
	fn metrics_keep_declaration_order() {
		let mut table = MetadataTable::new();
		table.insert(
			"X",
			ComponentMetadata {
				title: "X".into(),
				category: "App".into(),
				description: String::new(),
				metrics: vec![
					("zeta".into(), "1".into()),
					("alpha".into(), "2".into()),
				],
			},
		);
		let labels: Vec<_> = table
			.lookup(&NodeId::from("X"))
			.metrics
			.into_iter()
			.map(|(k, _)| k)
			.collect();
		assert_eq!(labels, ["zeta", "alpha"]);
	}
}
