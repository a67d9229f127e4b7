use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use fastrace::collector::{Reporter, SpanRecord};
use userdir_types::FunctionStats;

pub struct CollectingReporter {
    spans: Arc<Mutex<Vec<SpanRecord>>>,
}

impl CollectingReporter {
    pub fn new() -> (Self, SpanCollector) {
        let spans = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                spans: spans.clone(),
            },
            SpanCollector { spans },
        )
    }
}

impl Reporter for CollectingReporter {
    fn report(&mut self, spans: Vec<SpanRecord>) {
        self.spans
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend(spans);
    }
}

pub struct SpanCollector {
    spans: Arc<Mutex<Vec<SpanRecord>>>,
}

impl SpanCollector {
    pub fn collect_function_stats(&self) -> Vec<FunctionStats> {
        let spans =
            std::mem::take(&mut *self.spans.lock().unwrap_or_else(PoisonError::into_inner));
        let durations: Vec<(String, u64)> = spans
            .into_iter()
            .map(|s| (simplify_name(&s.name), s.duration_ns / 1000))
            .collect();
        compute_function_stats(durations)
    }
}

fn simplify_name(name: &str) -> String {
    let name = name.replace("::{{closure}}", "").replace("userdir_", "");

    if let Some(pos) = name.rfind("::") {
        name[pos + 2..].to_string()
    } else {
        name
    }
}

fn compute_function_stats(durations: Vec<(String, u64)>) -> Vec<FunctionStats> {
    let mut by_name: HashMap<String, Vec<u64>> = HashMap::new();
    for (name, duration_us) in durations {
        by_name.entry(name).or_default().push(duration_us);
    }

    let mut stats: Vec<FunctionStats> = by_name
        .into_iter()
        .map(|(name, durations)| {
            let calls = durations.len() as u32;
            let total_us: u64 = durations.iter().sum();
            let avg_us = if calls > 0 { total_us / calls as u64 } else { 0 };
            let max_us = durations.iter().copied().max().unwrap_or(0);

            FunctionStats {
                name,
                calls,
                total_us,
                avg_us,
                max_us,
            }
        })
        .collect();

    stats.sort_by(|a, b| b.total_us.cmp(&a.total_us));
    stats
}
