//! Two-phase breadth-first crawl.
//!
//! The bounded phase explores up to `max_iterations` entities, enqueueing
//! every newly discovered neighbour. The closure phase then drains whatever
//! is still queued, describing each entity and linking it only to entities
//! already discovered, so the frontier can only shrink and the output graph
//! has no discovered-but-undescribed nodes.

use std::fmt;
use std::time::Duration;

use crate::crawl::frontier::Frontier;
use crate::crawl::pacer::RatePacer;
use crate::crawl::recovery::{SkipReason, StepError};
use crate::entity::{Entity, EntityRef, RelationClass};
use crate::error::{FoafhubError, Result};
use crate::graph::{describe, Graph, Vocabulary};
use crate::platform::{Connector, Platform, Quota};

/// Iteration budget and per-relation fan-out bounds.
#[derive(Debug, Clone)]
pub struct CrawlLimits {
    pub max_iterations: usize,
    pub max_following: usize,
    pub max_repos: usize,
    pub max_organizations: usize,
    pub max_members: usize,
    pub max_contributors: usize,
    /// Client rebuilds allowed per run before a network fault becomes fatal
    pub max_reconnects: usize,
    pub reconnect_delay: Duration,
}

impl CrawlLimits {
    pub fn fan_out(&self, class: RelationClass) -> usize {
        match class {
            RelationClass::Following => self.max_following,
            RelationClass::OwnedRepositories => self.max_repos,
            RelationClass::Memberships => self.max_organizations,
            RelationClass::Members => self.max_members,
            RelationClass::Contributors => self.max_contributors,
            RelationClass::Owner => 1,
        }
    }
}

impl Default for CrawlLimits {
    fn default() -> Self {
        Self {
            max_iterations: 5,
            max_following: 30,
            max_repos: 30,
            max_organizations: 30,
            max_members: 30,
            max_contributors: 30,
            max_reconnects: 5,
            reconnect_delay: Duration::from_secs(2),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Seeding,
    Bounded,
    Closure,
    Done,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Seeding => "seeding",
            Phase::Bounded => "bounded",
            Phase::Closure => "closure",
            Phase::Done => "done",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedNode {
    pub entity: EntityRef,
    pub phase: Phase,
    pub reason: SkipReason,
}

/// Counters and skips of one crawl run.
#[derive(Debug, Clone, Default)]
pub struct CrawlReport {
    /// Entities dequeued during the bounded phase
    pub iterations: usize,
    /// Frontier length at the bounded -> closure transition
    pub queue_size: usize,
    pub described: usize,
    pub skipped: Vec<SkippedNode>,
    pub reconnects: usize,
    pub cooldowns: usize,
    pub discovered: usize,
    pub triples: usize,
}

/// Result of a crawl: the output graph and its report.
#[derive(Debug)]
pub struct CrawlOutcome {
    pub graph: Graph,
    pub report: CrawlReport,
}

/// State owned by one run.
struct Run {
    phase: Phase,
    frontier: Frontier,
    graph: Graph,
    report: CrawlReport,
}

/// Traversal controller.
pub struct Crawler {
    connector: Box<dyn Connector>,
    platform: Box<dyn Platform>,
    vocab: Vocabulary,
    limits: CrawlLimits,
    pacer: RatePacer,
}

impl Crawler {
    /// Connect a platform client and build a crawler around it.
    pub async fn connect(
        connector: Box<dyn Connector>,
        vocab: Vocabulary,
        limits: CrawlLimits,
        pacer: RatePacer,
    ) -> Result<Self> {
        let platform = connector.connect().await?;
        Ok(Self {
            connector,
            platform,
            vocab,
            limits,
            pacer,
        })
    }

    /// Quota last reported by the current client.
    pub fn quota(&self) -> Quota {
        self.platform.quota()
    }

    /// Crawl outward from `seed` and return the resulting graph.
    ///
    /// Skippable per-node failures are recorded in the report; any other
    /// failure aborts the run.
    pub async fn crawl(&mut self, seed: EntityRef) -> Result<CrawlOutcome> {
        let mut run = Run {
            phase: Phase::Seeding,
            frontier: Frontier::new(self.vocab.clone()),
            graph: Graph::new(),
            report: CrawlReport::default(),
        };

        run.frontier.resolve(&seed);
        run.frontier.enqueue(seed);

        run.phase = Phase::Bounded;
        let max_iterations = self.limits.max_iterations;
        let mut iteration = 1;
        while iteration <= max_iterations {
            let Some(entity) = run.frontier.dequeue() else {
                break;
            };
            log::info!("[{}/{}] {} {}", iteration, max_iterations, run.phase, entity);
            self.step(&mut run, entity).await?;
            iteration += 1;
        }
        run.report.iterations = iteration - 1;

        run.phase = Phase::Closure;
        let queue_size = run.frontier.len();
        run.report.queue_size = queue_size;
        if queue_size > 0 {
            log::info!("Iteration budget spent; closing {} queued entities", queue_size);
        }
        let mut position = 0;
        while let Some(entity) = run.frontier.dequeue() {
            position += 1;
            log::info!("[{}/{}] {} {}", position, queue_size, run.phase, entity);
            self.step(&mut run, entity).await?;
        }

        run.phase = Phase::Done;
        run.report.discovered = run.frontier.discovered();
        run.report.triples = run.graph.len();
        log::info!(
            "Crawl done: {} described, {} skipped, {} triples",
            run.report.described,
            run.report.skipped.len(),
            run.report.triples
        );

        Ok(CrawlOutcome {
            graph: run.graph,
            report: run.report,
        })
    }

    /// Process one dequeued entity under the recovery policy.
    async fn step(&mut self, run: &mut Run, entity: EntityRef) -> Result<()> {
        let result = self.expand(run, &entity).await;
        run.frontier.mark_visited(&entity);

        match result {
            Ok(()) => Ok(()),
            Err(StepError::Skip(reason)) => {
                log::warn!("Skipped {} ({}): {}", entity, reason.class(), reason);
                if reason.needs_reconnect() {
                    self.reconnect(&mut run.report).await?;
                }
                run.report.skipped.push(SkippedNode {
                    entity,
                    phase: run.phase,
                    reason,
                });
                Ok(())
            }
            Err(StepError::Fatal(err)) => {
                log::error!("Aborting crawl at {}: {}", entity, err);
                Err(err)
            }
        }
    }

    /// Describe `key` and link it to its related entities.
    async fn expand(&self, run: &mut Run, key: &EntityRef) -> std::result::Result<(), StepError> {
        self.pace(&mut run.report).await;
        let entity = self.platform.fetch(key).await?;
        let canonical = entity.key();
        if !run.frontier.alias(key, &canonical) {
            log::debug!("{} resolved to {}, already described", key, canonical);
            return Ok(());
        }
        let node = run.frontier.resolve(key);
        describe(&mut run.graph, &self.vocab, &entity, &node);
        run.report.described += 1;

        for &class in entity.relation_classes() {
            let limit = self.limits.fan_out(class);
            let targets = self.related(&mut run.report, key, &entity, class, limit).await?;

            for target in targets.into_iter().take(limit) {
                let target_node = match run.phase {
                    Phase::Closure => match run.frontier.node(&target) {
                        Some(known) => known.clone(),
                        None => continue,
                    },
                    _ => {
                        let resolved = run.frontier.resolve(&target);
                        if resolved != node && !run.frontier.is_visited(&target) {
                            run.frontier.enqueue(target);
                        }
                        resolved
                    }
                };
                let (subject, predicate, object) = self.vocab.edge(class, &node, &target_node);
                run.graph.add_node(subject, predicate, object);
            }
        }
        Ok(())
    }

    /// Entities related to `key` through `class`. A repository's owner is
    /// part of the fetched entity and needs no request.
    async fn related(
        &self,
        report: &mut CrawlReport,
        key: &EntityRef,
        entity: &Entity,
        class: RelationClass,
        limit: usize,
    ) -> Result<Vec<EntityRef>> {
        if let (Entity::Repository(repo), RelationClass::Owner) = (entity, class) {
            return Ok(vec![repo.owner.clone()]);
        }
        self.pace(report).await;
        log::debug!("Listing {} of {} (limit {})", class, key, limit);
        self.platform.related(key, class, limit).await
    }

    async fn pace(&self, report: &mut CrawlReport) {
        if self.pacer.pace(self.platform.quota()).await {
            report.cooldowns += 1;
        }
    }

    /// Replace the platform client after a connectivity fault. Traversal
    /// state is untouched.
    async fn reconnect(&mut self, report: &mut CrawlReport) -> Result<()> {
        loop {
            if report.reconnects >= self.limits.max_reconnects {
                return Err(FoafhubError::Network(format!(
                    "giving up after {} reconnect(s)",
                    report.reconnects
                )));
            }
            report.reconnects += 1;
            tokio::time::sleep(self.limits.reconnect_delay).await;

            match self.connector.connect().await {
                Ok(platform) => {
                    log::info!("Reconnected to platform (attempt {})", report.reconnects);
                    self.platform = platform;
                    return Ok(());
                }
                Err(FoafhubError::Network(detail)) => {
                    log::warn!("Reconnect attempt {} failed: {}", report.reconnects, detail);
                }
                Err(err) => return Err(err),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Term;
    use crate::platform::memory::{account, organization, repository, MemoryConnector, MemoryWorld};
    use std::collections::BTreeSet;
    use std::sync::Arc;

    fn limits(max_iterations: usize) -> CrawlLimits {
        CrawlLimits {
            max_iterations,
            reconnect_delay: Duration::from_millis(0),
            ..CrawlLimits::default()
        }
    }

    async fn crawler(connector: MemoryConnector, limits: CrawlLimits) -> Crawler {
        Crawler::connect(
            Box::new(connector),
            Vocabulary::default(),
            limits,
            RatePacer::new(10, Duration::from_millis(1)),
        )
        .await
        .unwrap()
    }

    async fn run(world: MemoryWorld, limits: CrawlLimits, seed: EntityRef) -> (CrawlOutcome, Arc<MemoryWorld>) {
        let connector = world.into_connector();
        let handle = connector.world();
        let mut crawler = crawler(connector, limits).await;
        let outcome = crawler.crawl(seed).await.unwrap();
        (outcome, handle)
    }

    fn is_typed(graph: &Graph, vocab: &Vocabulary, node: &crate::graph::Node) -> bool {
        graph.objects(node, &vocab.rdf_type).next().is_some()
    }

    /// alice follows bob, carol, dave and owns alice/proj.
    fn alice_world() -> MemoryWorld {
        MemoryWorld::new()
            .with(account("alice"))
            .with(account("bob"))
            .with(account("carol"))
            .with(account("dave"))
            .with(account("erin"))
            .with(repository("alice/proj", EntityRef::account("alice")))
            .relate(
                EntityRef::account("alice"),
                RelationClass::Following,
                vec![
                    EntityRef::account("bob"),
                    EntityRef::account("carol"),
                    EntityRef::account("dave"),
                ],
            )
            .relate(
                EntityRef::account("alice"),
                RelationClass::OwnedRepositories,
                vec![EntityRef::repository("alice/proj")],
            )
            .relate(
                EntityRef::account("bob"),
                RelationClass::Following,
                vec![EntityRef::account("carol"), EntityRef::account("erin")],
            )
            .relate(
                EntityRef::repository("alice/proj"),
                RelationClass::Contributors,
                vec![EntityRef::account("alice"), EntityRef::account("erin")],
            )
    }

    #[tokio::test]
    async fn test_single_iteration_scenario() {
        let limits = CrawlLimits {
            max_following: 2,
            ..limits(1)
        };
        let (outcome, world) = run(alice_world(), limits, EntityRef::account("alice")).await;
        let vocab = Vocabulary::default();
        let graph = &outcome.graph;
        let alice = vocab.mint(&EntityRef::account("alice"));
        let bob = vocab.mint(&EntityRef::account("bob"));
        let carol = vocab.mint(&EntityRef::account("carol"));
        let proj = vocab.mint(&EntityRef::repository("alice/proj"));

        let follows: BTreeSet<Term> = graph.objects(&alice, &vocab.follows).cloned().collect();
        assert_eq!(follows.len(), 2);
        assert!(follows.contains(&Term::Node(bob.clone())));
        assert!(follows.contains(&Term::Node(carol.clone())));
        assert!(graph.contains(&proj, &vocab.creator, &Term::Node(alice.clone())));

        // bob, carol and alice/proj were queued at the transition and described in closure
        assert_eq!(outcome.report.iterations, 1);
        assert_eq!(outcome.report.queue_size, 3);
        assert_eq!(outcome.report.described, 4);
        for node in [&alice, &bob, &carol, &proj] {
            assert!(is_typed(graph, &vocab, node), "{} not described", node);
        }

        // closure links only to known nodes: bob -> carol yes, bob -> erin no
        assert!(graph.contains(&bob, &vocab.follows, &Term::Node(carol.clone())));
        assert!(graph.contains(&proj, &vocab.contributor, &Term::Node(alice.clone())));
        let erin = vocab.mint(&EntityRef::account("erin"));
        assert!(graph.iter().all(|t| t.object.as_node() != Some(&erin) && t.subject != erin));

        // dave was cut by the fan-out bound and never fetched
        assert_eq!(world.fetch_count(&EntityRef::account("dave")), 0);
        assert_eq!(world.fetch_count(&EntityRef::account("erin")), 0);
    }

    #[tokio::test]
    async fn test_closure_never_grows_frontier() {
        let (outcome, world) = run(alice_world(), limits(1), EntityRef::account("alice")).await;
        // alice's listings discover bob, carol, dave, alice/proj; nothing else is fetched
        assert_eq!(outcome.report.queue_size, 4);
        assert_eq!(outcome.report.described, 5);
        assert_eq!(outcome.report.discovered, 5);
        assert_eq!(world.fetch_count(&EntityRef::account("erin")), 0);
    }

    #[tokio::test]
    async fn test_no_duplicate_description() {
        // diamond plus cycle: a -> b, a -> c, b -> d, c -> d, d -> a
        let world = MemoryWorld::new()
            .with(account("a"))
            .with(account("b"))
            .with(account("c"))
            .with(account("d"))
            .relate(EntityRef::account("a"), RelationClass::Following, vec![EntityRef::account("b"), EntityRef::account("c")])
            .relate(EntityRef::account("b"), RelationClass::Following, vec![EntityRef::account("d")])
            .relate(EntityRef::account("c"), RelationClass::Following, vec![EntityRef::account("d")])
            .relate(EntityRef::account("d"), RelationClass::Following, vec![EntityRef::account("a")]);
        let (outcome, world) = run(world, limits(100), EntityRef::account("a")).await;
        assert_eq!(world.max_fetch_count(), 1);
        assert_eq!(outcome.report.described, 4);
        assert_eq!(outcome.report.queue_size, 0);
        // both paths into d are kept as distinct statements
        let vocab = Vocabulary::default();
        let d = Term::Node(vocab.mint(&EntityRef::account("d")));
        let into_d = outcome.graph.iter().filter(|t| t.object == d).count();
        assert_eq!(into_d, 2);
    }

    #[tokio::test]
    async fn test_fan_out_bound_per_class() {
        let many: Vec<_> = (0..6).map(|i| EntityRef::account(format!("u{}", i))).collect();
        let mut world = MemoryWorld::new()
            .with(account("seed"))
            .relate(EntityRef::account("seed"), RelationClass::Following, many.clone());
        for r in &many {
            world = world.with(account(&r.key));
        }
        let limits = CrawlLimits {
            max_following: 3,
            ..limits(10)
        };
        let (outcome, _) = run(world, limits, EntityRef::account("seed")).await;
        let vocab = Vocabulary::default();
        let seed = vocab.mint(&EntityRef::account("seed"));
        assert_eq!(outcome.graph.objects(&seed, &vocab.follows).count(), 3);
    }

    /// alice's world plus an organization carol belongs to.
    fn acme_world() -> MemoryWorld {
        alice_world()
            .with(organization("acme"))
            .with(repository("acme/tool", EntityRef::organization("acme")))
            .relate(EntityRef::account("carol"), RelationClass::Memberships, vec![EntityRef::organization("acme")])
            .relate(
                EntityRef::organization("acme"),
                RelationClass::Members,
                vec![EntityRef::account("carol"), EntityRef::account("dave")],
            )
            .relate(
                EntityRef::organization("acme"),
                RelationClass::OwnedRepositories,
                vec![EntityRef::repository("acme/tool")],
            )
            .relate(EntityRef::repository("acme/tool"), RelationClass::Contributors, vec![EntityRef::account("erin")])
    }

    #[tokio::test]
    async fn test_edges_point_at_described_nodes() {
        let vocab = Vocabulary::default();
        let edges = [&vocab.follows, &vocab.creator, &vocab.member_of, &vocab.contributor];
        for budget in 1..=8 {
            let (outcome, _) = run(acme_world(), limits(budget), EntityRef::account("alice")).await;
            for triple in outcome.graph.iter().filter(|t| edges.contains(&&t.predicate)) {
                let object = triple.object.as_node().unwrap();
                assert!(is_typed(&outcome.graph, &vocab, &triple.subject), "budget {}: {} undescribed", budget, triple.subject);
                assert!(is_typed(&outcome.graph, &vocab, object), "budget {}: {} undescribed", budget, object);
            }
        }
    }

    fn typed_as<'a>(graph: &'a Graph, vocab: &Vocabulary, class: &crate::graph::Node) -> Vec<&'a str> {
        let class = Term::Node(class.clone());
        graph
            .subjects()
            .into_iter()
            .filter(|s| graph.contains(s, &vocab.rdf_type, &class))
            .map(|s| s.as_str())
            .collect()
    }

    #[tokio::test]
    async fn test_case_variant_seed_is_one_entity() {
        let world = MemoryWorld::new()
            .with(account("alice"))
            .with(account("bob"))
            .alias(EntityRef::account("Alice"), EntityRef::account("alice"))
            .relate(EntityRef::account("alice"), RelationClass::Following, vec![EntityRef::account("bob")])
            .relate(EntityRef::account("bob"), RelationClass::Following, vec![EntityRef::account("alice")]);
        let (outcome, world) = run(world, limits(10), EntityRef::account("Alice")).await;
        let vocab = Vocabulary::default();

        assert_eq!(world.fetch_count(&EntityRef::account("alice")), 1);
        assert_eq!(outcome.report.described, 2);
        assert_eq!(
            typed_as(&outcome.graph, &vocab, &vocab.person),
            vec!["http://github2foaf.org/users#alice", "http://github2foaf.org/users#bob"]
        );
        let alice = vocab.mint(&EntityRef::account("alice"));
        let bob = vocab.mint(&EntityRef::account("bob"));
        assert!(outcome.graph.contains(&bob, &vocab.follows, &Term::Node(alice)));
    }

    #[tokio::test]
    async fn test_renamed_repository_keeps_requested_node() {
        let world = alice_world().alias(
            EntityRef::repository("alice/old"),
            EntityRef::repository("alice/proj"),
        );
        let (outcome, world) = run(world, limits(10), EntityRef::repository("alice/old")).await;
        let vocab = Vocabulary::default();

        assert_eq!(world.fetch_count(&EntityRef::repository("alice/proj")), 1);
        assert_eq!(
            typed_as(&outcome.graph, &vocab, &vocab.software_source_code),
            vec!["http://github2foaf.org/repos#alice:old"]
        );
        // alice's repository listing names the new full name and lands on the same node
        let repo = vocab.mint(&EntityRef::repository("alice/old"));
        let alice = vocab.mint(&EntityRef::account("alice"));
        assert!(outcome.graph.contains(&repo, &vocab.creator, &Term::Node(alice)));
    }

    #[tokio::test]
    async fn test_forbidden_listing_skips_rest_of_node() {
        let world = alice_world().forbid_relation(EntityRef::account("alice"), RelationClass::OwnedRepositories);
        let (outcome, world) = run(world, limits(10), EntityRef::account("alice")).await;
        let vocab = Vocabulary::default();
        let alice = vocab.mint(&EntityRef::account("alice"));

        assert_eq!(outcome.report.skipped.len(), 1);
        let skipped = &outcome.report.skipped[0];
        assert_eq!(skipped.entity, EntityRef::account("alice"));
        assert!(matches!(skipped.reason, SkipReason::PermissionDenied(_)));
        assert_eq!(outcome.report.reconnects, 0);

        // described and linked up to the failing listing
        assert!(is_typed(&outcome.graph, &vocab, &alice));
        assert_eq!(outcome.graph.objects(&alice, &vocab.follows).count(), 3);
        assert_eq!(world.fetch_count(&EntityRef::repository("alice/proj")), 0);
        // the queue kept going
        assert_eq!(world.fetch_count(&EntityRef::account("bob")), 1);
        assert_eq!(world.fetch_count(&EntityRef::account("erin")), 1);
    }

    #[tokio::test]
    async fn test_network_fault_in_listing_reconnects() {
        let world = alice_world().flaky_relation(EntityRef::account("bob"), RelationClass::Following);
        let (outcome, world) = run(world, limits(10), EntityRef::account("alice")).await;
        let vocab = Vocabulary::default();

        assert_eq!(outcome.report.reconnects, 1);
        assert_eq!(world.connects(), 2);
        assert_eq!(outcome.report.skipped.len(), 1);
        assert_eq!(outcome.report.skipped[0].entity, EntityRef::account("bob"));
        assert!(outcome.report.skipped[0].reason.needs_reconnect());

        assert!(is_typed(&outcome.graph, &vocab, &vocab.mint(&EntityRef::account("bob"))));
        // erin is only reachable through bob's lost listing
        assert_eq!(world.fetch_count(&EntityRef::account("erin")), 0);
        assert_eq!(world.fetch_count(&EntityRef::account("carol")), 1);
        assert_eq!(world.fetch_count(&EntityRef::repository("alice/proj")), 1);
    }

    #[tokio::test]
    async fn test_repeat_crawl_yields_same_graph() {
        let first = run(alice_world(), limits(3), EntityRef::account("alice")).await.0;
        let second = run(alice_world(), limits(3), EntityRef::account("alice")).await.0;
        assert!(!first.graph.is_empty());
        assert_eq!(first.graph, second.graph);
    }

    #[tokio::test]
    async fn test_forbidden_node_is_skipped() {
        let world = alice_world().forbid(EntityRef::repository("alice/proj"));
        let (outcome, _) = run(world, limits(10), EntityRef::account("alice")).await;
        let skipped: Vec<_> = outcome.report.skipped.iter().map(|s| &s.entity).collect();
        assert_eq!(skipped, vec![&EntityRef::repository("alice/proj")]);
        assert!(matches!(outcome.report.skipped[0].reason, SkipReason::PermissionDenied(_)));

        let vocab = Vocabulary::default();
        let proj = vocab.mint(&EntityRef::repository("alice/proj"));
        assert!(!is_typed(&outcome.graph, &vocab, &proj));
        // the rest of the crawl went on
        assert!(is_typed(&outcome.graph, &vocab, &vocab.mint(&EntityRef::account("erin"))));
    }

    #[tokio::test]
    async fn test_network_fault_reconnects_and_continues() {
        let world = alice_world().flaky(EntityRef::account("bob"));
        let (outcome, world) = run(world, limits(10), EntityRef::account("alice")).await;
        assert_eq!(outcome.report.reconnects, 1);
        assert_eq!(world.connects(), 2);
        assert_eq!(outcome.report.skipped.len(), 1);
        assert!(outcome.report.skipped[0].reason.needs_reconnect());
        // bob is lost for this run, carol and the repository are not
        assert_eq!(world.fetch_count(&EntityRef::account("bob")), 0);
        assert_eq!(world.fetch_count(&EntityRef::account("carol")), 1);
        assert_eq!(world.fetch_count(&EntityRef::repository("alice/proj")), 1);
    }

    #[tokio::test]
    async fn test_reconnect_budget_exhausted_is_fatal() {
        let connector = alice_world().flaky(EntityRef::account("bob")).into_connector();
        let limits = CrawlLimits {
            max_reconnects: 0,
            ..limits(10)
        };
        let mut crawler = crawler(connector, limits).await;
        let result = crawler.crawl(EntityRef::account("alice")).await;
        assert!(matches!(result, Err(FoafhubError::Network(_))));
    }

    #[tokio::test]
    async fn test_unclassified_failure_aborts() {
        let connector = alice_world().broken(EntityRef::account("carol")).into_connector();
        let mut crawler = crawler(connector, limits(10)).await;
        let result = crawler.crawl(EntityRef::account("alice")).await;
        assert!(matches!(result, Err(FoafhubError::Api { status: 500, .. })));
    }

    #[tokio::test]
    async fn test_pacer_consulted_when_quota_scarce() {
        let world = alice_world().remaining(3);
        let (outcome, _) = run(world, limits(1), EntityRef::account("alice")).await;
        // one pace per fetch and per listing request
        assert!(outcome.report.cooldowns >= outcome.report.described);
        assert_eq!(outcome.report.described, 5);
    }

    #[tokio::test]
    async fn test_repository_seed_links_owner() {
        let (outcome, world) = run(alice_world(), limits(1), EntityRef::repository("alice/proj")).await;
        let vocab = Vocabulary::default();
        let proj = vocab.mint(&EntityRef::repository("alice/proj"));
        let alice = vocab.mint(&EntityRef::account("alice"));
        assert!(outcome.graph.contains(&proj, &vocab.creator, &Term::Node(alice.clone())));
        assert!(is_typed(&outcome.graph, &vocab, &alice));
        assert_eq!(world.fetch_count(&EntityRef::account("erin")), 1);
    }

    #[tokio::test]
    async fn test_missing_seed_is_fatal() {
        let connector = MemoryWorld::new().into_connector();
        let mut crawler = crawler(connector, limits(3)).await;
        let result = crawler.crawl(EntityRef::account("ghost")).await;
        assert!(matches!(result, Err(FoafhubError::NotFound(_))));
    }
}
