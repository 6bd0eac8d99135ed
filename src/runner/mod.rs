//! Task registry and dependency-ordered execution.
//!
//! A task is a named, independently invocable procedure that may declare
//! prerequisites. Resolution is a depth-first walk of the `needs` lists in
//! declaration order; every task appears in the execution order at most
//! once, even when reached through several paths. Execution is strictly
//! sequential and the first failing task aborts the run.

use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;

use crate::config::Config;
use crate::error::{Error, Result};

/// Boxed future returned by a task body.
pub type TaskFuture = Pin<Box<dyn Future<Output = Result<()>>>>;

/// Task entry point. Tasks get their own clone of the context; bodies are
/// plain async fns over `&Context`, wrapped by non-capturing closures in
/// the registry.
pub type TaskFn = fn(Context) -> TaskFuture;

/// Everything a task body gets to see: the immutable release configuration
/// plus the per-invocation options.
#[derive(Debug, Clone)]
pub struct Context {
    /// Release configuration, loaded once at startup
    pub config: Config,
    /// Per-invocation task options
    pub opts: TaskOptions,
}

/// Options shared by the installer tasks, settable from the command line.
#[derive(Debug, Clone)]
pub struct TaskOptions {
    /// Python minor version the installers target, e.g. "2.6"
    pub pyver: String,
    /// Wipe the build directory before each arch-specific build
    pub scratch: bool,
}

impl Default for TaskOptions {
    fn default() -> Self {
        Self {
            pyver: "2.6".to_string(),
            scratch: true,
        }
    }
}

/// One registered task.
#[derive(Debug)]
pub struct TaskDef {
    /// Task name as given on the command line
    pub name: &'static str,
    /// One-line description for `--list`
    pub about: &'static str,
    /// Prerequisite task names, run first in this order
    pub needs: &'static [&'static str],
    /// Task body
    pub run: TaskFn,
}

/// Task registry plus the resolution/execution logic.
pub struct Runner {
    tasks: Vec<TaskDef>,
}

impl Runner {
    /// Build a runner over a fixed task table.
    pub fn new(tasks: Vec<TaskDef>) -> Self {
        Self { tasks }
    }

    /// All registered tasks, in registration order.
    pub fn tasks(&self) -> &[TaskDef] {
        &self.tasks
    }

    /// Look up a task by name.
    pub fn get(&self, name: &str) -> Option<&TaskDef> {
        self.tasks.iter().find(|t| t.name == name)
    }

    /// Resolve the requested task names into an execution order.
    ///
    /// Prerequisites come before their dependents, in declaration order,
    /// and no task appears twice. Unknown names and dependency cycles are
    /// reported as errors.
    pub fn resolve(&self, names: &[&str]) -> Result<Vec<&TaskDef>> {
        let mut order = Vec::new();
        let mut done: HashSet<&str> = HashSet::new();
        let mut in_progress: Vec<&str> = Vec::new();
        for name in names {
            self.visit(name, &mut done, &mut in_progress, &mut order)?;
        }
        Ok(order)
    }

    fn visit<'a>(
        &'a self,
        name: &str,
        done: &mut HashSet<&'a str>,
        in_progress: &mut Vec<&'a str>,
        order: &mut Vec<&'a TaskDef>,
    ) -> Result<()> {
        if done.contains(name) {
            return Ok(());
        }
        if in_progress.iter().any(|n| *n == name) {
            return Err(Error::DependencyCycle(name.to_string()));
        }
        let task = self
            .get(name)
            .ok_or_else(|| Error::UnknownTask(name.to_string()))?;
        in_progress.push(task.name);
        for dep in task.needs {
            self.visit(dep, done, in_progress, order)?;
        }
        in_progress.pop();
        done.insert(task.name);
        order.push(task);
        Ok(())
    }

    /// Run the requested tasks and their prerequisites, sequentially.
    pub async fn run(&self, names: &[&str], ctx: &Context) -> Result<()> {
        let order = self.resolve(names)?;
        for task in &order {
            log::info!("task {}", task.name);
            (task.run)(ctx.clone()).await?;
        }
        Ok(())
    }
}
