//! Deterministic discrete-event schedule simulation.
//!
//! Materializes a sequenced operation list into start/finish times under
//! two state registers: the earliest idle time of each machine and the
//! earliest time each order may begin each stage. Both are allocated
//! fresh per call, so the simulation is a pure function of its inputs:
//! identical inputs produce bit-identical schedules.

use crate::encoding::SequencedOps;
use crate::models::{Instance, Schedule, ScheduledOp};

/// Simulates a sequenced operation list into a [`Schedule`].
///
/// For each operation in sequence order:
/// `start = max(machine_available, job_stage_available)`,
/// `finish = start + duration`; the machine register advances to
/// `finish` and the order's next stage is released at `finish`.
pub fn simulate(instance: &Instance, sequenced: &SequencedOps) -> Schedule {
    let num_orders = instance.num_orders();
    let num_stages = instance.num_stages();

    let mut machine_available = vec![0.0_f64; instance.num_machines()];
    let mut job_stage_available = vec![0.0_f64; num_orders * num_stages];
    let mut completion = vec![0.0_f64; num_orders];
    let mut entries = Vec::with_capacity(sequenced.ops.len());

    for op in &sequenced.ops {
        let slot = op.order * num_stages + op.stage;
        let earliest_start = machine_available[op.machine].max(job_stage_available[slot]);
        let start = earliest_start;
        let finish = start + op.total_time;

        machine_available[op.machine] = finish;
        if op.stage + 1 < num_stages {
            job_stage_available[slot + 1] = finish;
        }
        if op.stage == num_stages - 1 {
            completion[op.order] = finish;
        }

        entries.push(ScheduledOp {
            order: op.order,
            stage: op.stage,
            machine: op.machine,
            start,
            finish,
            duration: op.total_time,
        });
    }

    Schedule::new(entries, completion)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::{sequence, Chromosome};
    use crate::models::{Machine, Order};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn simulate_candidate(instance: &Instance, ch: &Chromosome) -> Schedule {
        let ops = ch.decode(instance).unwrap();
        let seq = sequence(ops, instance.num_orders());
        simulate(instance, &seq)
    }

    /// One order, two stages, one machine: operations chain on both the
    /// machine and the stage precedence.
    #[test]
    fn test_single_machine_two_stages() {
        let inst = Instance::builder()
            .order(Order::new("A"))
            .machine(Machine::new("M"))
            .stage("S0", ["M"])
            .stage("S1", ["M"])
            .stage_time("S0", "M", 10.0)
            .stage_time("S1", "M", 7.0)
            .build()
            .unwrap();

        // Any valid candidate yields the same schedule.
        let mut rng = SmallRng::seed_from_u64(3);
        for _ in 0..10 {
            let ch = Chromosome::random(inst.total_ops(), &mut rng);
            let schedule = simulate_candidate(&inst, &ch);

            assert_eq!(schedule.len(), 2);
            let e0 = &schedule.entries[0];
            let e1 = &schedule.entries[1];
            assert_eq!((e0.stage, e0.start, e0.finish), (0, 0.0, 10.0));
            assert_eq!((e1.stage, e1.start, e1.finish), (1, 10.0, 17.0));
            assert!((schedule.completion_seconds(0) - 17.0).abs() < 1e-10);
        }
    }

    /// A single order with a single stage yields one entry on its
    /// assigned machine.
    #[test]
    fn test_single_operation_schedule() {
        let inst = Instance::builder()
            .order(Order::new("A").with_quantity(4))
            .machine(Machine::new("M1"))
            .machine(Machine::new("M2"))
            .stage("S0", ["M1", "M2"])
            .stage_time("S0", "M1", 3.0)
            .stage_time("S0", "M2", 3.0)
            .build()
            .unwrap();

        let ch = Chromosome::from_parts(&[0.4], &[0.6]);
        let schedule = simulate_candidate(&inst, &ch);
        assert_eq!(schedule.len(), 1);
        let e = &schedule.entries[0];
        assert_eq!(e.machine, 1);
        assert_eq!((e.start, e.finish), (0.0, 12.0));
    }

    /// Two orders contending for one machine: priority order decides.
    #[test]
    fn test_machine_contention() {
        let inst = Instance::builder()
            .order(Order::new("A"))
            .order(Order::new("B"))
            .machine(Machine::new("M"))
            .stage("S0", ["M"])
            .stage_time("S0", "M", 5.0)
            .build()
            .unwrap();

        let ch = Chromosome::from_parts(&[0.1, 0.9], &[0.0, 0.0]);
        let schedule = simulate_candidate(&inst, &ch);
        let b = schedule.entries_for_order(1).next().unwrap();
        assert!((b.start - 5.0).abs() < 1e-10);
        assert!((b.finish - 10.0).abs() < 1e-10);

        // Swapping the priorities reverses the order.
        let ch = Chromosome::from_parts(&[0.9, 0.1], &[0.0, 0.0]);
        let schedule = simulate_candidate(&inst, &ch);
        let a = schedule.entries_for_order(0).next().unwrap();
        assert!((a.start - 5.0).abs() < 1e-10);
        let b = schedule.entries_for_order(1).next().unwrap();
        assert!((b.start - 0.0).abs() < 1e-10);
    }

    /// Two orders on two parallel machines run concurrently.
    #[test]
    fn test_parallel_machines() {
        let inst = Instance::builder()
            .order(Order::new("A"))
            .order(Order::new("B"))
            .machine(Machine::new("M1"))
            .machine(Machine::new("M2"))
            .stage("S0", ["M1", "M2"])
            .stage_time("S0", "M1", 5.0)
            .stage_time("S0", "M2", 5.0)
            .build()
            .unwrap();

        let ch = Chromosome::from_parts(&[0.1, 0.9], &[0.2, 0.7]);
        let schedule = simulate_candidate(&inst, &ch);

        let a = schedule.entries_for_order(0).next().unwrap();
        let b = schedule.entries_for_order(1).next().unwrap();
        assert_eq!(a.machine, 0);
        assert_eq!(b.machine, 1);
        assert!((a.start - 0.0).abs() < 1e-10);
        assert!((b.start - 0.0).abs() < 1e-10);
    }

    /// Precedence, machine exclusivity, and finish = start + duration
    /// hold over randomized candidates.
    #[test]
    fn test_schedule_invariants_randomized() {
        let inst = Instance::builder()
            .order(Order::new("A").with_quantity(2))
            .order(Order::new("B"))
            .order(Order::new("C").with_quantity(3))
            .machine(Machine::new("M1"))
            .machine(Machine::new("M2"))
            .stage("S0", ["M1", "M2"])
            .stage("S1", ["M2"])
            .stage("S2", ["M1"])
            .stage_time("S0", "M1", 4.0)
            .stage_time("S0", "M2", 6.0)
            .stage_time("S1", "M2", 3.0)
            .stage_time("S2", "M1", 5.0)
            .build()
            .unwrap();

        let mut rng = SmallRng::seed_from_u64(42);
        for _ in 0..50 {
            let ch = Chromosome::random(inst.total_ops(), &mut rng);
            let schedule = simulate_candidate(&inst, &ch);

            assert_eq!(schedule.len(), inst.total_ops());

            for e in &schedule.entries {
                // finish = start + duration, bit-exactly.
                assert_eq!(e.finish, e.start + e.duration);
            }

            // Stage s2 never starts before s1 finishes within an order.
            for order in 0..inst.num_orders() {
                let entries: Vec<_> = schedule.entries_for_order(order).collect();
                for pair in entries.windows(2) {
                    assert!(pair[1].start >= pair[0].finish - 1e-12);
                }
            }

            // No two entries on the same machine overlap.
            for machine in 0..inst.num_machines() {
                let mut entries: Vec<_> = schedule.entries_for_machine(machine).collect();
                entries.sort_by(|a, b| a.start.total_cmp(&b.start));
                for pair in entries.windows(2) {
                    assert!(pair[1].start >= pair[0].finish - 1e-12);
                }
            }
        }
    }

    /// Determinism: the same sequenced input simulates identically.
    #[test]
    fn test_simulation_is_pure() {
        let inst = Instance::builder()
            .order(Order::new("A"))
            .order(Order::new("B"))
            .machine(Machine::new("M"))
            .stage("S0", ["M"])
            .stage("S1", ["M"])
            .stage_time("S0", "M", 2.0)
            .stage_time("S1", "M", 3.0)
            .build()
            .unwrap();

        let mut rng = SmallRng::seed_from_u64(11);
        let ch = Chromosome::random(inst.total_ops(), &mut rng);
        let ops = ch.decode(&inst).unwrap();
        let seq = sequence(ops, inst.num_orders());

        let first = simulate(&inst, &seq);
        let second = simulate(&inst, &seq);
        assert_eq!(first, second);
    }
}
