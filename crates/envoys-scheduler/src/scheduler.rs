use std::collections::BTreeMap;

/// Handle to a scheduled task, used to cancel it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(u64);


impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "task#{}", self.0)
    }
}

/// A registered repeating task.
#[derive(Debug, Clone)]
struct TaskEntry<T> {
    task: T,
    period: u64,
    next_run: u64,
}

/// Repeating task scheduler driven by the server tick.
///
/// The scheduler never runs anything itself: `advance` hands back the payload
/// of every task due on the new tick and the owner dispatches it.
pub struct TickScheduler<T> {
    // Keyed by id so due tasks come out in registration order.
    tasks: BTreeMap<TaskId, TaskEntry<T>>,
    next_task_id: u64,
    current_tick: u64,
}

impl<T: Clone> TickScheduler<T> {
    pub fn new() -> Self {
        Self {
            tasks: BTreeMap::new(),
            next_task_id: 1,
            current_tick: 0,
        }
    }

    /// Register a task that fires every `period` ticks, starting one period from now.
    pub fn schedule_repeating(&mut self, task: T, period: u64) -> TaskId {
        let period = period.max(1);
        let id = TaskId(self.next_task_id);
        self.next_task_id += 1;

        self.tasks.insert(
            id,
            TaskEntry {
                task,
                period,
                next_run: self.current_tick + period,
            },
        );
        tracing::trace!("Scheduled {} every {} ticks", id, period);
        id
    }

    /// Cancel a task. Returns false if it was not scheduled.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        self.tasks.remove(&id).is_some()
    }

    pub fn is_scheduled(&self, id: TaskId) -> bool {
        self.tasks.contains_key(&id)
    }

    /// Move forward one tick and collect every task due on it.
    pub fn advance(&mut self) -> Vec<(TaskId, T)> {
        self.current_tick += 1;
        let now = self.current_tick;

        let mut due = Vec::new();
        for (id, entry) in self.tasks.iter_mut() {
            if entry.next_run <= now {
                entry.next_run = now + entry.period;
                due.push((*id, entry.task.clone()));
            }
        }
        due
    }

    pub fn current_tick(&self) -> u64 {
        self.current_tick
    }

    /// Number of live (not cancelled) tasks.
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }
}

impl<T: Clone> Default for TickScheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}
