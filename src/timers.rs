use crate::dom::NodeId;
use crate::{Error, Page, Result};

#[derive(Debug, Clone)]
pub(crate) enum TimerAction {
    BeginFadeOut { node: NodeId, fade_ms: i64 },
    DetachNode { node: NodeId },
    RefreshTimeLabels,
    Enhance,
}

#[derive(Debug, Clone)]
pub(crate) struct ScheduledTask {
    pub(crate) id: i64,
    pub(crate) due_at: i64,
    pub(crate) order: i64,
    pub(crate) interval_ms: Option<i64>,
    pub(crate) action: TimerAction,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTimer {
    pub id: i64,
    pub due_at: i64,
    pub order: i64,
    pub interval_ms: Option<i64>,
}

impl Page {
    pub fn now_ms(&self) -> i64 {
        self.now_ms
    }

    pub fn advance_time(&mut self, delta_ms: i64) -> Result<()> {
        if delta_ms < 0 {
            return Err(Error::Runtime(
                "advance_time requires non-negative milliseconds".into(),
            ));
        }
        let from = self.now_ms;
        self.now_ms = self.now_ms.saturating_add(delta_ms);
        let ran = self.run_due_timers_internal()?;
        self.trace_timer_line(format!(
            "[timer] advance delta_ms={} from={} to={} ran_due={}",
            delta_ms, from, self.now_ms, ran
        ));
        Ok(())
    }

    pub fn advance_time_to(&mut self, target_ms: i64) -> Result<()> {
        if target_ms < self.now_ms {
            return Err(Error::Runtime(format!(
                "advance_time_to requires target >= now_ms (target={target_ms}, now_ms={})",
                self.now_ms
            )));
        }
        let from = self.now_ms;
        self.now_ms = target_ms;
        let ran = self.run_due_timers_internal()?;
        self.trace_timer_line(format!(
            "[timer] advance_to from={} to={} ran_due={}",
            from, self.now_ms, ran
        ));
        Ok(())
    }

    pub fn run_due_timers(&mut self) -> Result<usize> {
        let ran = self.run_due_timers_internal()?;
        self.trace_timer_line(format!(
            "[timer] run_due now_ms={} ran={}",
            self.now_ms, ran
        ));
        Ok(ran)
    }

    pub fn flush(&mut self) -> Result<()> {
        let from = self.now_ms;
        let ran = self.run_timer_queue(None, true)?;
        self.trace_timer_line(format!(
            "[timer] flush from={} to={} ran={}",
            from, self.now_ms, ran
        ));
        Ok(())
    }

    pub fn pending_timers(&self) -> Vec<PendingTimer> {
        let mut timers = self
            .task_queue
            .iter()
            .map(|task| PendingTimer {
                id: task.id,
                due_at: task.due_at,
                order: task.order,
                interval_ms: task.interval_ms,
            })
            .collect::<Vec<_>>();
        timers.sort_by_key(|timer| (timer.due_at, timer.order));
        timers
    }

    pub fn clear_all_timers(&mut self) -> usize {
        let cleared = self.task_queue.len();
        self.task_queue.clear();
        self.refresh_timer_id = None;
        self.resize_debounce_id = None;
        self.trace_timer_line(format!("[timer] clear_all cleared={cleared}"));
        cleared
    }

    pub fn set_timer_step_limit(&mut self, max_steps: usize) -> Result<()> {
        if max_steps == 0 {
            return Err(Error::Runtime(
                "set_timer_step_limit requires at least 1 step".into(),
            ));
        }
        self.timer_step_limit = max_steps;
        Ok(())
    }

    pub(crate) fn set_timeout(&mut self, delay_ms: i64, action: TimerAction) -> i64 {
        self.schedule_task(delay_ms, None, action)
    }

    pub(crate) fn set_interval(&mut self, interval_ms: i64, action: TimerAction) -> i64 {
        self.schedule_task(interval_ms, Some(interval_ms), action)
    }

    fn schedule_task(
        &mut self,
        delay_ms: i64,
        interval_ms: Option<i64>,
        action: TimerAction,
    ) -> i64 {
        let id = self.next_timer_id;
        self.next_timer_id += 1;
        let order = self.next_task_order;
        self.next_task_order += 1;
        let due_at = self.now_ms.saturating_add(delay_ms.max(0));
        self.trace_timer_line(format!(
            "[timer] schedule id={id} due_at={due_at} interval_ms={}",
            interval_ms.map(|v| v.to_string()).unwrap_or_else(|| "none".into())
        ));
        self.task_queue.push(ScheduledTask {
            id,
            due_at,
            order,
            interval_ms,
            action,
        });
        id
    }

    pub(crate) fn clear_timeout(&mut self, timer_id: i64) -> bool {
        let before = self.task_queue.len();
        self.task_queue.retain(|task| task.id != timer_id);
        let existed = self.task_queue.len() != before;
        if existed {
            self.trace_timer_line(format!("[timer] clear id={timer_id}"));
        }
        existed
    }

    fn run_due_timers_internal(&mut self) -> Result<usize> {
        self.run_timer_queue(Some(self.now_ms), false)
    }

    fn run_timer_queue(&mut self, due_limit: Option<i64>, advance_clock: bool) -> Result<usize> {
        let mut steps = 0usize;
        while let Some(next_idx) = self.next_task_index(due_limit) {
            steps += 1;
            if steps > self.timer_step_limit {
                return Err(self.timer_step_limit_error(self.timer_step_limit, steps, due_limit));
            }
            let task = self.task_queue.remove(next_idx);
            if advance_clock && task.due_at > self.now_ms {
                self.now_ms = task.due_at;
            }
            self.execute_timer_task(task)?;
        }
        Ok(steps)
    }

    fn next_task_index(&self, due_limit: Option<i64>) -> Option<usize> {
        self.task_queue
            .iter()
            .enumerate()
            .filter(|(_, task)| due_limit.map(|limit| task.due_at <= limit).unwrap_or(true))
            .min_by_key(|(_, task)| (task.due_at, task.order))
            .map(|(idx, _)| idx)
    }

    fn timer_step_limit_error(
        &self,
        max_steps: usize,
        steps: usize,
        due_limit: Option<i64>,
    ) -> Error {
        let due_limit_desc = due_limit
            .map(|value| value.to_string())
            .unwrap_or_else(|| "none".into());
        Error::Runtime(format!(
            "timer queue exceeded max task steps (possible unstopped interval): limit={max_steps}, steps={steps}, now_ms={}, due_limit={}, pending_tasks={}",
            self.now_ms,
            due_limit_desc,
            self.task_queue.len()
        ))
    }

    fn execute_timer_task(&mut self, task: ScheduledTask) -> Result<()> {
        self.trace_timer_line(format!(
            "[timer] run id={} due_at={} interval_ms={} now_ms={}",
            task.id,
            task.due_at,
            task.interval_ms
                .map(|v| v.to_string())
                .unwrap_or_else(|| "none".into()),
            self.now_ms
        ));

        if let Some(interval_ms) = task.interval_ms {
            let order = self.next_task_order;
            self.next_task_order += 1;
            self.task_queue.push(ScheduledTask {
                id: task.id,
                due_at: task.due_at.saturating_add(interval_ms.max(1)),
                order,
                interval_ms: Some(interval_ms),
                action: task.action.clone(),
            });
        }

        match task.action {
            TimerAction::BeginFadeOut { node, fade_ms } => {
                if self.dom.element(node).is_some() {
                    self.dom
                        .style_set(node, "transition", "opacity 0.5s ease-out")?;
                    self.dom.style_set(node, "opacity", "0")?;
                }
                self.set_timeout(fade_ms, TimerAction::DetachNode { node });
            }
            TimerAction::DetachNode { node } => {
                // Removal of an already-detached node is a no-op.
                if self.dom.parent(node).is_some() {
                    self.dom.remove_node(node)?;
                }
            }
            TimerAction::RefreshTimeLabels => {
                self.update_relative_times()?;
            }
            TimerAction::Enhance => {
                self.resize_debounce_id = None;
                self.apply_enhancements()?;
            }
        }
        Ok(())
    }
}
