use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::{
    context::Context,
    error::{GraphError, Result},
    task::{NextAction, Task},
};

/// Default upper bound on task executions per run
pub const DEFAULT_MAX_STEPS: usize = 32;

/// Type alias for edge condition functions
pub type EdgeCondition = Arc<dyn Fn(&Context) -> bool + Send + Sync>;

/// Outgoing transition of a task
#[derive(Clone)]
pub enum Edge {
    /// Always go to `to`
    Direct { to: String },
    /// Go to `yes` when the condition holds, otherwise to `no`
    Conditional {
        condition: EdgeCondition,
        yes: String,
        no: String,
    },
}

impl Edge {
    fn target(&self, context: &Context) -> &str {
        match self {
            Edge::Direct { to } => to,
            Edge::Conditional { condition, yes, no } => {
                if condition(context) {
                    yes
                } else {
                    no
                }
            }
        }
    }
}

/// Summary of a completed run
#[derive(Debug, Clone)]
pub struct RunReport {
    /// IDs of the tasks in execution order
    pub trail: Vec<String>,
    /// Response of the last task that produced one
    pub response: Option<String>,
    /// Status message of the last task that produced one
    pub status_message: Option<String>,
}

impl RunReport {
    /// ID of the task the run stopped at
    pub fn last_task(&self) -> Option<&str> {
        self.trail.last().map(String::as_str)
    }
}

/// An immutable graph of tasks. Safe to share across concurrent runs; all
/// per-run state lives in the [`Context`] handed to [`Graph::run`].
pub struct Graph {
    pub id: String,
    tasks: HashMap<String, Arc<dyn Task>>,
    edges: HashMap<String, Edge>,
    start_task_id: Option<String>,
    max_steps: usize,
}

impl Graph {
    pub fn start_task_id(&self) -> Option<&str> {
        self.start_task_id.as_deref()
    }

    pub fn get_task(&self, task_id: &str) -> Option<Arc<dyn Task>> {
        self.tasks.get(task_id).cloned()
    }

    /// Resolve the task that follows `current_task_id`, if any
    pub fn find_next_task(&self, current_task_id: &str, context: &Context) -> Option<String> {
        self.edges
            .get(current_task_id)
            .map(|edge| edge.target(context).to_string())
    }

    /// Run the graph from its start task until a task ends the run or a task
    /// without an outgoing edge continues.
    pub async fn run(&self, context: Context) -> Result<RunReport> {
        let mut current = self
            .start_task_id
            .clone()
            .ok_or(GraphError::NoStartTask)?;
        let mut report = RunReport {
            trail: Vec::new(),
            response: None,
            status_message: None,
        };

        loop {
            if report.trail.len() >= self.max_steps {
                return Err(GraphError::StepLimitExceeded(self.max_steps));
            }

            let task = self
                .get_task(&current)
                .ok_or_else(|| GraphError::TaskNotFound(current.clone()))?;

            debug!(graph_id = %self.id, task_id = %current, "Executing task");
            let result = task.run(context.clone()).await?;
            report.trail.push(current.clone());

            if result.response.is_some() {
                report.response = result.response;
            }
            if result.status_message.is_some() {
                report.status_message = result.status_message;
            }

            current = match result.next_action {
                NextAction::End => break,
                NextAction::GoTo(target_id) => {
                    if !self.tasks.contains_key(&target_id) {
                        return Err(GraphError::TaskNotFound(target_id));
                    }
                    target_id
                }
                NextAction::Continue => match self.find_next_task(&current, &context) {
                    Some(next) => next,
                    None => break,
                },
            };
        }

        Ok(report)
    }
}

/// Builder for creating graphs
pub struct GraphBuilder {
    id: String,
    tasks: HashMap<String, Arc<dyn Task>>,
    edges: HashMap<String, Edge>,
    start_task_id: Option<String>,
    max_steps: usize,
}

impl GraphBuilder {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tasks: HashMap::new(),
            edges: HashMap::new(),
            start_task_id: None,
            max_steps: DEFAULT_MAX_STEPS,
        }
    }

    /// Add a task. The first task added becomes the start task.
    pub fn add_task(mut self, task: Arc<dyn Task>) -> Self {
        let task_id = task.id().to_string();
        if self.start_task_id.is_none() {
            self.start_task_id = Some(task_id.clone());
        }
        self.tasks.insert(task_id, task);
        self
    }

    /// Connect `from` to `to`. A task has at most one outgoing edge; adding
    /// another replaces it.
    pub fn add_edge(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.edges.insert(from.into(), Edge::Direct { to: to.into() });
        self
    }

    /// Branch from `from` to `yes` or `no` depending on `condition`
    pub fn add_conditional_edge<F>(
        mut self,
        from: impl Into<String>,
        condition: F,
        yes: impl Into<String>,
        no: impl Into<String>,
    ) -> Self
    where
        F: Fn(&Context) -> bool + Send + Sync + 'static,
    {
        self.edges.insert(
            from.into(),
            Edge::Conditional {
                condition: Arc::new(condition),
                yes: yes.into(),
                no: no.into(),
            },
        );
        self
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn build(self) -> Graph {
        Graph {
            id: self.id,
            tasks: self.tasks,
            edges: self.edges,
            start_task_id: self.start_task_id,
            max_steps: self.max_steps,
        }
    }
}
