/*!
 * Synchronization Primitives
 *
 * The value-carrying condition used to fan a shutdown state out to
 * worker threads. All cross-thread interaction funnels through the
 * single mutex/condvar pair owned by `Condition`.
 */

mod condition;

pub use condition::Condition;
