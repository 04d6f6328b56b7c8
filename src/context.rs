//! The `Context` owns everything a simulation needs for its lifetime: the queue of timed plans,
//! a queue of immediate callbacks, event subscriptions and the data containers that modules
//! register through [`define_data_plugin!`](crate::define_data_plugin).
//!
//! Plans fire in non-decreasing order of time. Plans scheduled for the same time fire in the
//! order they were added. Any callback may add further plans, which is how recurring activities
//! (a workplace opening and closing every day, for instance) are expressed: each firing schedules
//! its own successor.
//!
//! A run ends when there is nothing left to do or when some callback calls
//! [`Context::shutdown`]. `execute` then returns to its caller; the engine never terminates the
//! hosting process.
use std::any::{Any, TypeId};
use std::collections::VecDeque;
use std::rc::Rc;

use log::trace;

use crate::data_plugin::DataPlugin;
use crate::hashing::HashMap;
use crate::plan::Queue;

/// Marker trait for values that can be passed to [`Context::emit_event`].
pub trait Event: Copy + 'static {}

type Callback = dyn FnOnce(&mut Context);
type EventHandler<E> = dyn Fn(&mut Context, E);

pub struct Context {
    plan_queue: Queue<Box<Callback>>,
    callback_queue: VecDeque<Box<Callback>>,
    event_handlers: HashMap<TypeId, Box<dyn Any>>,
    data_plugins: HashMap<TypeId, Box<dyn Any>>,
    current_time: f64,
    shutdown_requested: bool,
}

impl Context {
    #[must_use]
    pub fn new() -> Context {
        Context {
            plan_queue: Queue::new(),
            callback_queue: VecDeque::new(),
            event_handlers: HashMap::default(),
            data_plugins: HashMap::default(),
            current_time: 0.0,
            shutdown_requested: false,
        }
    }

    /// Schedule `callback` to run at `time`.
    ///
    /// # Panics
    ///
    /// Panics if `time` is NaN, infinite or earlier than the current time, or if the context has
    /// already been shut down. All of these are programming errors in the caller.
    pub fn add_plan(&mut self, time: f64, callback: impl FnOnce(&mut Context) + 'static) {
        assert!(
            !self.shutdown_requested,
            "Cannot add a plan after the simulation has been shut down"
        );
        assert!(
            time.is_finite() && time >= self.current_time,
            "Time is invalid: {time} (current time is {})",
            self.current_time
        );
        trace!("adding plan at {time}");
        self.plan_queue.add_plan(time, Box::new(callback));
    }

    /// Queue `callback` to run before the next timed plan, at the current time.
    ///
    /// # Panics
    ///
    /// Panics if the context has already been shut down.
    pub fn queue_callback(&mut self, callback: impl FnOnce(&mut Context) + 'static) {
        assert!(
            !self.shutdown_requested,
            "Cannot queue a callback after the simulation has been shut down"
        );
        self.callback_queue.push_back(Box::new(callback));
    }

    /// Register `handler` to be called for every event of type `E` emitted from now on.
    pub fn subscribe_to_event<E: Event>(&mut self, handler: impl Fn(&mut Context, E) + 'static) {
        let handler_vec = self
            .event_handlers
            .entry(TypeId::of::<E>())
            .or_insert_with(|| Box::<Vec<Rc<EventHandler<E>>>>::default());
        let handler_vec: &mut Vec<Rc<EventHandler<E>>> = handler_vec.downcast_mut().unwrap();
        handler_vec.push(Rc::new(handler));
    }

    /// Emit `event` to every subscriber. Handlers run as queued callbacks, so they observe the
    /// state left behind by the code that emitted the event.
    ///
    /// # Panics
    ///
    /// Panics if the context has already been shut down.
    pub fn emit_event<E: Event>(&mut self, event: E) {
        assert!(
            !self.shutdown_requested,
            "Cannot emit an event after the simulation has been shut down"
        );
        let Context {
            event_handlers,
            callback_queue,
            ..
        } = self;
        if let Some(handler_vec) = event_handlers.get(&TypeId::of::<E>()) {
            let handler_vec: &Vec<Rc<EventHandler<E>>> = handler_vec.downcast_ref().unwrap();
            for handler in handler_vec {
                let handler = Rc::clone(handler);
                callback_queue.push_back(Box::new(move |context| handler(context, event)));
            }
        }
    }

    /// Returns the data container for `T`, creating it if it does not exist yet.
    pub fn get_data_container_mut<T: DataPlugin>(&mut self, _plugin: T) -> &mut T::DataContainer {
        self.data_plugins
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(T::create_data_container()))
            .downcast_mut::<T::DataContainer>()
            .unwrap()
    }

    /// Returns the data container for `T`, or `None` if nothing has created it yet.
    #[must_use]
    pub fn get_data_container<T: DataPlugin>(&self, _plugin: T) -> Option<&T::DataContainer> {
        self.data_plugins
            .get(&TypeId::of::<T>())
            .and_then(|container| container.downcast_ref::<T::DataContainer>())
    }

    #[must_use]
    pub fn get_current_time(&self) -> f64 {
        self.current_time
    }

    /// Request that `execute` stop before running anything else.
    pub fn shutdown(&mut self) {
        trace!("shutdown requested at {}", self.current_time);
        self.shutdown_requested = true;
    }

    #[must_use]
    pub fn is_shutdown(&self) -> bool {
        self.shutdown_requested
    }

    /// Number of timed plans that have not fired yet.
    #[must_use]
    pub fn remaining_plan_count(&self) -> usize {
        self.plan_queue.len()
    }

    /// Run the simulation until there is nothing left to do or `shutdown` is called.
    pub fn execute(&mut self) {
        trace!("entering event loop");
        loop {
            if self.shutdown_requested {
                break;
            }

            // Callbacks queued at the current time run before the next plan.
            if let Some(callback) = self.callback_queue.pop_front() {
                callback(self);
                continue;
            }

            if let Some(plan) = self.plan_queue.get_next_plan() {
                self.current_time = plan.time;
                (plan.data)(self);
            } else {
                break;
            }
        }
        trace!("event loop finished at {}", self.current_time);
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}
